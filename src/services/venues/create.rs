use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::errors::AcademyError;
use crate::models::{ApiResponse, ErrorCode, venues::requests::CreateVenueRequest};
use crate::services::storage_from_request;
use crate::utils::error_response;
use crate::utils::validate::validate_name;

pub async fn create_venue(
    mut venue_data: CreateVenueRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if let Err(msg) = validate_name(&venue_data.name) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::ValidationFailed, msg)));
    }
    venue_data.name = venue_data.name.trim().to_string();

    let storage = storage_from_request(request)?;
    match storage.create_venue(venue_data).await {
        Ok(venue) => Ok(HttpResponse::Created()
            .json(ApiResponse::success(venue, "Venue created successfully"))),
        Err(AcademyError::Conflict(_)) => Ok(super::venue_conflict()),
        Err(e) => Ok(error_response(&e)),
    }
}
