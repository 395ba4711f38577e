use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/schedule.ts")]
pub struct CreateScheduleSlotRequest {
    pub weekday: i32,
    pub start_time: String,
    pub instructor_id: i64,
    pub venue_id: i64,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/schedule.ts")]
pub struct ScheduleSlotListParams {
    // 默认只返回启用中的排课
    #[serde(default)]
    pub include_inactive: bool,
}
