use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use crate::errors::AcademyError;
use crate::models::{
    ApiResponse, ErrorCode,
    enrollments::{entities::EnrollmentPolicy, requests::EnrollRequest},
    users::entities::UserRole,
};
use crate::services::{bad_request, current_user, storage_from_request};
use crate::utils::clock::clock_from_request;
use crate::utils::error_response_with;

use super::resolve_target_user;

pub async fn enroll(
    request: &HttpRequest,
    occurrence_id: i64,
    body: EnrollRequest,
) -> ActixResult<HttpResponse> {
    let actor = current_user(request)?;
    let storage = storage_from_request(request)?;
    let now = clock_from_request(request).now();

    let (user_id, policy) = match actor.role {
        UserRole::Student => {
            if body.user_id.is_some_and(|id| id != actor.id) {
                return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
                    ErrorCode::EnrollmentPermissionDenied,
                    "Students can only enroll themselves",
                )));
            }
            (actor.id, EnrollmentPolicy::SelfService { now })
        }
        UserRole::Admin => {
            let Some(user_id) = body.user_id else {
                return Ok(bad_request(
                    ErrorCode::ValidationFailed,
                    "user_id is required when enrolling on behalf of a student",
                ));
            };
            match resolve_target_user(&storage, user_id).await {
                Ok(_) => {}
                Err(AcademyError::InvalidState(msg)) => {
                    return Ok(bad_request(ErrorCode::UserInactive, msg));
                }
                Err(e) => return Ok(error_response_with(&e, ErrorCode::UserNotFound)),
            }
            (user_id, EnrollmentPolicy::Staff)
        }
        UserRole::Instructor => {
            return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
                ErrorCode::EnrollmentPermissionDenied,
                "Instructors cannot create enrollments",
            )));
        }
    };

    match storage.enroll(occurrence_id, user_id, policy, actor.id, now).await {
        Ok(enrollment) => {
            info!(
                "User {} enrolled in occurrence {} by {}",
                user_id, occurrence_id, actor.id
            );
            Ok(HttpResponse::Created()
                .json(ApiResponse::success(enrollment, "Enrollment created successfully")))
        }
        Err(e) => Ok(error_response_with(&e, ErrorCode::OccurrenceNotFound)),
    }
}
