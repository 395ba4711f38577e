use serde::Serialize;
use ts_rs::TS;

use crate::models::{PaginationInfo, occurrences::entities::Occurrence};

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/occurrence.ts")]
pub struct GenerateOccurrencesResponse {
    // 本次新建的场次数
    pub created: usize,
    // 已存在而跳过的场次数
    pub skipped: usize,
    pub occurrences: Vec<Occurrence>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/occurrence.ts")]
pub struct OccurrenceListResponse {
    pub items: Vec<Occurrence>,
    pub pagination: PaginationInfo,
}
