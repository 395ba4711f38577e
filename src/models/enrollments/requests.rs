use serde::Deserialize;
use ts_rs::TS;

use crate::models::{common::PaginationQuery, enrollments::entities::EnrollmentStatus};

// 报名请求；学员只能为自己报名，管理员必须指定 user_id
#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/enrollment.ts")]
pub struct EnrollRequest {
    pub user_id: Option<i64>,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/enrollment.ts")]
pub struct BulkEnrollItem {
    pub occurrence_id: i64,
    pub user_id: i64,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/enrollment.ts")]
pub struct BulkEnrollRequest {
    pub items: Vec<BulkEnrollItem>,
}

// 我的报名查询参数
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/enrollment.ts")]
pub struct MyEnrollmentsParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub status: Option<EnrollmentStatus>,
}

// 场次名单查询参数，默认不含已取消的报名
#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/enrollment.ts")]
pub struct OccurrenceEnrollmentsParams {
    #[serde(default)]
    pub include_cancelled: bool,
}
