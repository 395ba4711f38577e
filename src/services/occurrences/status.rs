use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use crate::models::{ApiResponse, ErrorCode, users::entities::UserRole};
use crate::services::{current_user, storage_from_request};
use crate::utils::clock::clock_from_request;
use crate::utils::error_response_with;

/// 管理员可确认任意场次，教练只能确认自己带的场次
pub async fn confirm_occurrence(request: &HttpRequest, id: i64) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = storage_from_request(request)?;

    let Some(occurrence) = storage.get_occurrence_by_id(id).await? else {
        return Ok(super::occurrence_not_found(id));
    };

    let permitted = match user.role {
        UserRole::Admin => true,
        UserRole::Instructor => occurrence.instructor_id == user.id,
        UserRole::Student => false,
    };
    if !permitted {
        return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::Forbidden,
            "Only an admin or the assigned instructor can confirm this occurrence",
        )));
    }

    match storage.confirm_occurrence(id).await {
        Ok(occurrence) => {
            info!("Occurrence {} confirmed by user {}", id, user.id);
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                occurrence,
                "Occurrence confirmed successfully",
            )))
        }
        Err(e) => Ok(error_response_with(&e, ErrorCode::OccurrenceNotFound)),
    }
}

pub async fn cancel_occurrence(request: &HttpRequest, id: i64) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = storage_from_request(request)?;
    let now = clock_from_request(request).now();

    match storage.cancel_occurrence(id, user.id, now).await {
        Ok(occurrence) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            occurrence,
            "Occurrence cancelled successfully",
        ))),
        Err(e) => Ok(error_response_with(&e, ErrorCode::OccurrenceNotFound)),
    }
}
