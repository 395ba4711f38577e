use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::models::{
    ApiResponse, ErrorCode,
    enrollments::requests::{MyEnrollmentsParams, OccurrenceEnrollmentsParams},
};
use crate::services::{current_user, storage_from_request};
use crate::utils::error_response_with;

/// 场次名单及名额信息
pub async fn list_occurrence_enrollments(
    request: &HttpRequest,
    occurrence_id: i64,
    params: OccurrenceEnrollmentsParams,
) -> ActixResult<HttpResponse> {
    let storage = storage_from_request(request)?;

    match storage
        .list_occurrence_enrollments(occurrence_id, params.include_cancelled)
        .await
    {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Enrollments retrieved successfully",
        ))),
        Err(e) => Ok(error_response_with(&e, ErrorCode::OccurrenceNotFound)),
    }
}

pub async fn list_my_enrollments(
    request: &HttpRequest,
    params: MyEnrollmentsParams,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = storage_from_request(request)?;

    let response = storage
        .list_user_enrollments(
            user.id,
            params.status,
            Some(params.pagination.page),
            Some(params.pagination.size),
        )
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        response,
        "Enrollments retrieved successfully",
    )))
}
