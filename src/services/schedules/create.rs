use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use crate::errors::AcademyError;
use crate::models::{ApiResponse, ErrorCode, schedules::requests::CreateScheduleSlotRequest};
use crate::services::{bad_request, check_instructor, check_venue, storage_from_request};
use crate::utils::error_response;
use crate::utils::validate::{validate_start_time, validate_weekday};

pub async fn create_slot(
    request: &HttpRequest,
    class_id: i64,
    slot_data: CreateScheduleSlotRequest,
) -> ActixResult<HttpResponse> {
    if let Err(msg) = validate_weekday(slot_data.weekday) {
        return Ok(bad_request(ErrorCode::ValidationFailed, msg));
    }
    if let Err(msg) = validate_start_time(&slot_data.start_time) {
        return Ok(bad_request(ErrorCode::ValidationFailed, msg));
    }

    let storage = storage_from_request(request)?;

    if storage.get_class_by_id(class_id).await?.is_none() {
        return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::ClassNotFound,
            "Class not found",
        )));
    }
    if let Some(rejection) = check_instructor(&storage, slot_data.instructor_id).await {
        return Ok(rejection);
    }
    if let Some(rejection) = check_venue(&storage, slot_data.venue_id).await {
        return Ok(rejection);
    }

    match storage.create_schedule_slot(class_id, slot_data).await {
        Ok(slot) => {
            info!(
                "Schedule slot {} created for class {} (weekday {}, {})",
                slot.id, class_id, slot.weekday, slot.start_time
            );
            Ok(HttpResponse::Created()
                .json(ApiResponse::success(slot, "Schedule slot created successfully")))
        }
        Err(AcademyError::Conflict(msg)) => Ok(HttpResponse::Conflict()
            .json(ApiResponse::error_empty(ErrorCode::ScheduleSlotConflict, msg))),
        Err(e) => Ok(error_response(&e)),
    }
}
