use crate::models::{common::PaginationQuery, venues::entities::ActiveStatus};
use serde::Deserialize;
use ts_rs::TS;

// 课程查询参数（来自HTTP请求）
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/class.ts")]
pub struct ClassQueryParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub sport: Option<String>,
    pub status: Option<ActiveStatus>,
    pub search: Option<String>,
}

// 创建课程请求
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/class.ts")]
pub struct CreateClassRequest {
    pub name: String,
    pub sport: String,
    pub level: String,
    pub duration_minutes: i32,
    pub capacity_max: i32,
    pub price_cents: Option<i64>,
}

// 更新课程请求
//
// duration_minutes 只影响之后生成的场次，已生成场次的结束时间保持不变
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/class.ts")]
pub struct UpdateClassRequest {
    pub name: Option<String>,
    pub sport: Option<String>,
    pub level: Option<String>,
    pub duration_minutes: Option<i32>,
    pub capacity_max: Option<i32>,
    pub price_cents: Option<i64>,
    pub status: Option<ActiveStatus>,
}

// 课程列表查询参数（用于存储层）
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/class.ts")]
pub struct ClassListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub sport: Option<String>,
    pub status: Option<ActiveStatus>,
    pub search: Option<String>,
}
