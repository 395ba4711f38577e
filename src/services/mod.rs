//! 业务服务层
//!
//! 每个服务以 `Lazy` 单例的形式被路由处理程序调用，存储和时钟从 `app_data` 中取得。

pub mod auth;
pub mod classes;
pub mod enrollments;
pub mod occurrences;
pub mod schedules;
pub mod users;
pub mod venues;

pub use auth::AuthService;
pub use classes::ClassService;
pub use enrollments::EnrollmentService;
pub use occurrences::OccurrenceService;
pub use schedules::ScheduleService;
pub use users::UserService;
pub use venues::VenueService;

use actix_web::{HttpRequest, HttpResponse, web};
use std::sync::Arc;

use crate::errors::{AcademyError, Result};
use crate::middlewares::RequireJWT;
use crate::models::{
    ApiResponse, ErrorCode, users::entities::User, venues::entities::ActiveStatus,
};
use crate::storage::Storage;
use crate::utils::error_response;

pub(crate) fn storage_from_request(request: &HttpRequest) -> Result<Arc<dyn Storage>> {
    request
        .app_data::<web::Data<Arc<dyn Storage>>>()
        .map(|data| data.get_ref().clone())
        .ok_or_else(|| AcademyError::database_connection("Storage not found in app data"))
}

/// RequireJWT 之后才可用
pub(crate) fn current_user(request: &HttpRequest) -> Result<User> {
    RequireJWT::extract_user_claims(request)
        .ok_or_else(|| AcademyError::authentication("Unauthorized access, please login"))
}

pub(crate) fn bad_request(code: ErrorCode, msg: impl Into<String>) -> HttpResponse {
    HttpResponse::BadRequest().json(ApiResponse::error_empty(code, msg))
}

/// 教练必须存在、处于启用状态并具备授课角色
pub(crate) async fn check_instructor(
    storage: &Arc<dyn Storage>,
    instructor_id: i64,
) -> Option<HttpResponse> {
    match storage.get_user_by_id(instructor_id).await {
        Ok(Some(user)) if user.is_active() && user.role.can_instruct() => None,
        Ok(Some(_)) => Some(bad_request(
            ErrorCode::InstructorInvalid,
            format!("User {instructor_id} cannot be scheduled as an instructor"),
        )),
        Ok(None) => Some(bad_request(
            ErrorCode::InstructorInvalid,
            format!("Instructor {instructor_id} not found"),
        )),
        Err(e) => Some(error_response(&e)),
    }
}

pub(crate) async fn check_venue(storage: &Arc<dyn Storage>, venue_id: i64) -> Option<HttpResponse> {
    match storage.get_venue_by_id(venue_id).await {
        Ok(Some(venue)) if venue.status == ActiveStatus::Active => None,
        Ok(Some(_)) => Some(bad_request(
            ErrorCode::ValidationFailed,
            format!("Venue {venue_id} is inactive"),
        )),
        Ok(None) => Some(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::VenueNotFound,
            format!("Venue {venue_id} not found"),
        ))),
        Err(e) => Some(error_response(&e)),
    }
}
