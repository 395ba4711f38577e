use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::venues::entities::ActiveStatus;

// 课程定义，排课和场次的根
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/class.ts")]
pub struct ClassDefinition {
    pub id: i64,
    pub name: String,
    // 运动项目，例如 beach_tennis
    pub sport: String,
    // 级别，例如 iniciante
    pub level: String,
    pub duration_minutes: i32,
    pub capacity_max: i32,
    // 单次课价格（分）
    pub price_cents: Option<i64>,
    pub status: ActiveStatus,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl ClassDefinition {
    /// 只有启用中的课程才能生成场次
    pub fn is_schedulable(&self) -> bool {
        self.status == ActiveStatus::Active
    }
}
