use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use crate::models::{ApiResponse, ErrorCode, occurrences::requests::UpdateOccurrenceRequest};
use crate::services::{bad_request, check_instructor, check_venue, storage_from_request};
use crate::utils::error_response_with;

pub async fn update_occurrence(
    request: &HttpRequest,
    id: i64,
    body: UpdateOccurrenceRequest,
) -> ActixResult<HttpResponse> {
    if body.instructor_id.is_none() && body.venue_id.is_none() {
        return Ok(bad_request(
            ErrorCode::ValidationFailed,
            "Provide instructor_id and/or venue_id",
        ));
    }

    let storage = storage_from_request(request)?;

    if let Some(instructor_id) = body.instructor_id
        && let Some(rejection) = check_instructor(&storage, instructor_id).await
    {
        return Ok(rejection);
    }
    if let Some(venue_id) = body.venue_id
        && let Some(rejection) = check_venue(&storage, venue_id).await
    {
        return Ok(rejection);
    }

    match storage.update_occurrence(id, body).await {
        Ok(occurrence) => {
            info!(
                "Occurrence {} reassigned (instructor {}, venue {})",
                id, occurrence.instructor_id, occurrence.venue_id
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                occurrence,
                "Occurrence updated successfully",
            )))
        }
        Err(e) => Ok(error_response_with(&e, ErrorCode::OccurrenceNotFound)),
    }
}
