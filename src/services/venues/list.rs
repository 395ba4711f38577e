use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::models::{ApiResponse, venues::requests::VenueListParams};
use crate::services::storage_from_request;

pub async fn list_venues(
    query: VenueListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = storage_from_request(request)?;
    let response = storage.list_venues_with_pagination(query).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        response,
        "Venue list retrieved successfully",
    )))
}
