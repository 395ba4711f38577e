use crate::models::{common::PaginationQuery, venues::entities::ActiveStatus};
use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/venue.ts")]
pub struct CreateVenueRequest {
    pub name: String,
    pub sport: Option<String>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/venue.ts")]
pub struct UpdateVenueRequest {
    pub name: Option<String>,
    pub sport: Option<String>,
    pub status: Option<ActiveStatus>,
}

// 场地查询参数（来自HTTP请求）
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/venue.ts")]
pub struct VenueListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub status: Option<ActiveStatus>,
    pub search: Option<String>,
}
