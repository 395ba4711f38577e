use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use crate::errors::AcademyError;
use crate::models::{
    ApiResponse, ErrorCode, enrollments::entities::CancellationActor, users::entities::UserRole,
};
use crate::services::{current_user, storage_from_request};
use crate::utils::clock::clock_from_request;
use crate::utils::error_response_with;

pub async fn cancel_enrollment(request: &HttpRequest, enrollment_id: i64) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = storage_from_request(request)?;
    let now = clock_from_request(request).now();

    let actor = match user.role {
        UserRole::Admin => CancellationActor::Staff { user_id: user.id },
        _ => CancellationActor::SelfService {
            user_id: user.id,
            now,
        },
    };

    match storage.cancel_enrollment(enrollment_id, actor, now).await {
        Ok(enrollment) => {
            info!(
                "Enrollment {} (occurrence {}) cancelled by user {}",
                enrollment.id, enrollment.occurrence_id, user.id
            );
            Ok(HttpResponse::NoContent().finish())
        }
        Err(AcademyError::Authorization(msg)) => Ok(HttpResponse::Forbidden().json(
            ApiResponse::error_empty(ErrorCode::EnrollmentPermissionDenied, msg),
        )),
        Err(e) => Ok(error_response_with(&e, ErrorCode::EnrollmentNotFound)),
    }
}
