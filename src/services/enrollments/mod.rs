pub mod bulk;
pub mod cancel;
pub mod enroll;
pub mod list;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::errors::{AcademyError, Result};
use crate::models::enrollments::requests::{
    BulkEnrollRequest, EnrollRequest, MyEnrollmentsParams, OccurrenceEnrollmentsParams,
};
use crate::models::users::entities::User;
use crate::storage::Storage;

pub struct EnrollmentService;

impl EnrollmentService {
    pub fn new_lazy() -> Self {
        Self
    }

    pub async fn enroll(
        &self,
        request: &HttpRequest,
        occurrence_id: i64,
        body: EnrollRequest,
    ) -> ActixResult<HttpResponse> {
        enroll::enroll(request, occurrence_id, body).await
    }

    // 批量报名，逐条处理，允许部分成功
    pub async fn bulk_enroll(
        &self,
        request: &HttpRequest,
        body: BulkEnrollRequest,
    ) -> ActixResult<HttpResponse> {
        bulk::bulk_enroll(request, body).await
    }

    pub async fn cancel(&self, request: &HttpRequest, enrollment_id: i64) -> ActixResult<HttpResponse> {
        cancel::cancel_enrollment(request, enrollment_id).await
    }

    pub async fn list_for_occurrence(
        &self,
        request: &HttpRequest,
        occurrence_id: i64,
        params: OccurrenceEnrollmentsParams,
    ) -> ActixResult<HttpResponse> {
        list::list_occurrence_enrollments(request, occurrence_id, params).await
    }

    pub async fn list_mine(
        &self,
        request: &HttpRequest,
        params: MyEnrollmentsParams,
    ) -> ActixResult<HttpResponse> {
        list::list_my_enrollments(request, params).await
    }
}

/// 管理员代报名的目标用户必须存在且处于启用状态
pub(crate) async fn resolve_target_user(storage: &Arc<dyn Storage>, user_id: i64) -> Result<User> {
    let user = storage
        .get_user_by_id(user_id)
        .await?
        .ok_or_else(|| AcademyError::not_found(format!("User {user_id} not found")))?;

    if !user.is_active() {
        return Err(AcademyError::invalid_state(format!(
            "User {user_id} is not active"
        )));
    }
    Ok(user)
}
