use serde::Serialize;
use ts_rs::TS;

use crate::models::{PaginationInfo, classes::entities::ClassDefinition};

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/class.ts")]
pub struct ClassListResponse {
    pub items: Vec<ClassDefinition>,
    pub pagination: PaginationInfo,
}
