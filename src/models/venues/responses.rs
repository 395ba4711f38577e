use serde::Serialize;
use ts_rs::TS;

use crate::models::{PaginationInfo, venues::entities::Venue};

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/venue.ts")]
pub struct VenueListResponse {
    pub items: Vec<Venue>,
    pub pagination: PaginationInfo,
}
