use serde::Serialize;
use ts_rs::TS;

use crate::models::{
    PaginationInfo,
    enrollments::entities::Enrollment,
    occurrences::entities::Occurrence,
};

// 场次名额信息，字段名与现有前端保持一致
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/enrollment.ts")]
pub struct EnrollmentMeta {
    #[serde(rename = "capacidade_atual")]
    pub current: i32,
    #[serde(rename = "capacidade_maxima")]
    pub maximum: i32,
    #[serde(rename = "vagas_disponiveis")]
    pub available: i32,
    #[serde(rename = "ocorrencia")]
    pub occurrence: Occurrence,
}

impl EnrollmentMeta {
    pub fn new(occurrence: Occurrence, maximum: i32) -> Self {
        let current = occurrence.enrolled_count;
        Self {
            current,
            maximum,
            available: (maximum - current).max(0),
            occurrence,
        }
    }
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/enrollment.ts")]
pub struct OccurrenceEnrollmentsResponse {
    pub items: Vec<Enrollment>,
    pub meta: EnrollmentMeta,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/enrollment.ts")]
pub struct BulkEnrollFailure {
    pub occurrence_id: i64,
    pub user_id: i64,
    // 机器可读原因，例如 CAPACITY_EXCEEDED
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/enrollment.ts")]
pub struct BulkEnrollResponse {
    pub enrolled: Vec<Enrollment>,
    pub failed: Vec<BulkEnrollFailure>,
}

// 我的报名：报名记录 + 场次
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/enrollment.ts")]
pub struct MyEnrollment {
    pub enrollment: Enrollment,
    pub occurrence: Occurrence,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/enrollment.ts")]
pub struct MyEnrollmentListResponse {
    pub items: Vec<MyEnrollment>,
    pub pagination: PaginationInfo,
}
