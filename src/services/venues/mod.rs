pub mod create;
pub mod list;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::models::venues::requests::{CreateVenueRequest, UpdateVenueRequest, VenueListParams};

pub struct VenueService;

impl VenueService {
    pub fn new_lazy() -> Self {
        Self
    }

    pub async fn list_venues(
        &self,
        query: VenueListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_venues(query, request).await
    }

    pub async fn create_venue(
        &self,
        venue_data: CreateVenueRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_venue(venue_data, request).await
    }

    pub async fn update_venue(
        &self,
        venue_id: i64,
        update_data: UpdateVenueRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_venue(venue_id, update_data, request).await
    }
}

fn venue_conflict() -> HttpResponse {
    HttpResponse::Conflict().json(crate::models::ApiResponse::error_empty(
        crate::models::ErrorCode::VenueAlreadyExists,
        "A venue with this name already exists",
    ))
}
