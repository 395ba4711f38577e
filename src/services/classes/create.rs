use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use crate::models::{ApiResponse, ErrorCode, classes::requests::CreateClassRequest};
use crate::services::storage_from_request;
use crate::utils::validate::{validate_class_numbers, validate_name};

pub async fn create_class(
    request: &HttpRequest,
    mut class_data: CreateClassRequest,
) -> ActixResult<HttpResponse> {
    let checks = validate_name(&class_data.name)
        .and_then(|_| validate_name(&class_data.sport))
        .and_then(|_| validate_name(&class_data.level))
        .and_then(|_| {
            validate_class_numbers(
                Some(class_data.duration_minutes),
                Some(class_data.capacity_max),
                class_data.price_cents,
            )
        });
    if let Err(msg) = checks {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::ValidationFailed, msg)));
    }
    class_data.name = class_data.name.trim().to_string();

    let storage = storage_from_request(request)?;
    let class = storage.create_class(class_data).await?;
    info!("Class {} ({}) created", class.id, class.name);

    Ok(HttpResponse::Created().json(ApiResponse::success(class, "Class created successfully")))
}
