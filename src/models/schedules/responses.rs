use serde::Serialize;
use ts_rs::TS;

use crate::models::schedules::entities::ScheduleSlot;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/schedule.ts")]
pub struct ScheduleSlotListResponse {
    pub items: Vec<ScheduleSlot>,
}
