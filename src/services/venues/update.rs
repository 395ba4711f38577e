use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::errors::AcademyError;
use crate::models::{ApiResponse, ErrorCode, venues::requests::UpdateVenueRequest};
use crate::services::storage_from_request;
use crate::utils::error_response;
use crate::utils::validate::validate_name;

pub async fn update_venue(
    venue_id: i64,
    update_data: UpdateVenueRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if let Some(ref name) = update_data.name
        && let Err(msg) = validate_name(name)
    {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::ValidationFailed, msg)));
    }

    let storage = storage_from_request(request)?;
    match storage.update_venue(venue_id, update_data).await {
        Ok(Some(venue)) => Ok(HttpResponse::Ok()
            .json(ApiResponse::success(venue, "Venue updated successfully"))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::VenueNotFound,
            "Venue not found",
        ))),
        Err(AcademyError::Conflict(_)) => Ok(super::venue_conflict()),
        Err(e) => Ok(error_response(&e)),
    }
}
