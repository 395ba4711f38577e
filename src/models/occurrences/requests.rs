use chrono::NaiveDate;
use serde::Deserialize;
use ts_rs::TS;

use crate::models::{
    common::{PaginationQuery, pagination::deserialize_optional_i64},
    occurrences::entities::OccurrenceStatus,
};

// 批量生成场次请求，日期区间为场馆本地日期，含两端
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/occurrence.ts")]
pub struct GenerateOccurrencesRequest {
    pub class_id: i64,
    pub range_start: NaiveDate,
    pub range_end: NaiveDate,
}

// 场次查询参数（来自HTTP请求）
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/occurrence.ts")]
pub struct OccurrenceListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub class_id: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub instructor_id: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub venue_id: Option<i64>,
    pub status: Option<OccurrenceStatus>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
}

// 场次列表查询参数（用于存储层），时间边界为 UTC 秒级时间戳
#[derive(Debug, Clone, Default)]
pub struct OccurrenceListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub class_id: Option<i64>,
    pub instructor_id: Option<i64>,
    pub venue_id: Option<i64>,
    pub status: Option<OccurrenceStatus>,
    pub starts_from: Option<i64>,
    pub starts_before: Option<i64>,
}

// 调整单个场次的教练或场地
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/occurrence.ts")]
pub struct UpdateOccurrenceRequest {
    pub instructor_id: Option<i64>,
    pub venue_id: Option<i64>,
}
