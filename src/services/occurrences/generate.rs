use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::config::AppConfig;
use crate::errors::AcademyError;
use crate::models::{
    ApiResponse, ErrorCode,
    occurrences::{expander::local_today, requests::GenerateOccurrencesRequest},
};
use crate::services::{bad_request, storage_from_request};
use crate::utils::clock::clock_from_request;
use crate::utils::error_response_with;
use crate::utils::validate::validate_generation_range;

pub async fn generate_occurrences(
    request: &HttpRequest,
    body: GenerateOccurrencesRequest,
) -> ActixResult<HttpResponse> {
    let schedule = &AppConfig::get().schedule;
    let now = clock_from_request(request).now();
    let today = local_today(now, schedule.utc_offset());

    if let Err(msg) = validate_generation_range(
        body.range_start,
        body.range_end,
        today,
        schedule.max_generation_days,
    ) {
        return Ok(bad_request(ErrorCode::ValidationFailed, msg));
    }

    let storage = storage_from_request(request)?;
    match storage
        .generate_occurrences(body.class_id, body.range_start, body.range_end, now)
        .await
    {
        Ok(result) => Ok(HttpResponse::Created().json(ApiResponse::success(
            result,
            "Occurrences generated successfully",
        ))),
        Err(AcademyError::InvalidState(msg)) => {
            Ok(bad_request(ErrorCode::ClassInactive, msg))
        }
        Err(e) => Ok(error_response_with(&e, ErrorCode::ClassNotFound)),
    }
}
