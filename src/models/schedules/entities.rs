use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::venues::entities::ActiveStatus;

// 每周固定排课：星期 + 开始时间 + 教练 + 场地
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/schedule.ts")]
pub struct ScheduleSlot {
    pub id: i64,
    pub class_id: i64,
    // ISO 星期：1 = 周一 ... 7 = 周日
    pub weekday: i32,
    // HH:MM，场馆本地时间
    pub start_time: String,
    pub instructor_id: i64,
    pub venue_id: i64,
    pub status: ActiveStatus,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl ScheduleSlot {
    pub fn start_time_parsed(&self) -> Option<NaiveTime> {
        NaiveTime::parse_from_str(&self.start_time, "%H:%M").ok()
    }
}
