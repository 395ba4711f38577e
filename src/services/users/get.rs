use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::models::users::responses::UserResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::storage_from_request;

pub async fn get_user(user_id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
    let storage = storage_from_request(request)?;

    match storage.get_user_by_id(user_id).await? {
        Some(user) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            UserResponse { user },
            "User information retrieved successfully",
        ))),
        None => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::UserNotFound,
            "User not found",
        ))),
    }
}
