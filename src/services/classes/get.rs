use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::models::ApiResponse;
use crate::services::storage_from_request;

pub async fn get_class(request: &HttpRequest, class_id: i64) -> ActixResult<HttpResponse> {
    let storage = storage_from_request(request)?;

    match storage.get_class_by_id(class_id).await? {
        Some(class) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            class,
            "Class information retrieved successfully",
        ))),
        None => Ok(super::class_not_found()),
    }
}
