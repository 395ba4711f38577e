use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::models::{ApiResponse, ErrorCode, classes::requests::UpdateClassRequest};
use crate::services::storage_from_request;
use crate::utils::validate::{validate_class_numbers, validate_name};

pub async fn update_class(
    request: &HttpRequest,
    class_id: i64,
    update_data: UpdateClassRequest,
) -> ActixResult<HttpResponse> {
    let names = [&update_data.name, &update_data.sport, &update_data.level];
    let checks = names
        .into_iter()
        .flatten()
        .try_for_each(|value| validate_name(value))
        .and_then(|_| {
            validate_class_numbers(
                update_data.duration_minutes,
                update_data.capacity_max,
                update_data.price_cents,
            )
        });
    if let Err(msg) = checks {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::ValidationFailed, msg)));
    }

    let storage = storage_from_request(request)?;
    match storage.update_class(class_id, update_data).await? {
        Some(class) => Ok(HttpResponse::Ok()
            .json(ApiResponse::success(class, "Class updated successfully"))),
        None => Ok(super::class_not_found()),
    }
}
