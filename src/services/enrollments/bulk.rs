use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::info;

use crate::config::AppConfig;
use crate::errors::AcademyError;
use crate::models::{
    ApiResponse, ErrorCode,
    enrollments::{
        entities::EnrollmentPolicy,
        requests::{BulkEnrollItem, BulkEnrollRequest},
        responses::{BulkEnrollFailure, BulkEnrollResponse},
    },
};
use crate::services::{bad_request, current_user, storage_from_request};
use crate::storage::Storage;
use crate::utils::clock::clock_from_request;
use crate::utils::error_response::classify;

use super::resolve_target_user;

fn failure(item: &BulkEnrollItem, err: &AcademyError) -> BulkEnrollFailure {
    let (_, code) = classify(err, ErrorCode::NotFound);
    BulkEnrollFailure {
        occurrence_id: item.occurrence_id,
        user_id: item.user_id,
        code: code.reason().to_string(),
        message: err.message().to_string(),
    }
}

/// 逐条走同一个名额闸门，单条失败不影响其他条目
pub(crate) async fn enroll_items(
    storage: &Arc<dyn Storage>,
    items: &[BulkEnrollItem],
    actor_id: i64,
    now: DateTime<Utc>,
) -> BulkEnrollResponse {
    let mut enrolled = Vec::new();
    let mut failed = Vec::new();

    for item in items {
        let outcome = match resolve_target_user(storage, item.user_id).await {
            Ok(_) => {
                storage
                    .enroll(
                        item.occurrence_id,
                        item.user_id,
                        EnrollmentPolicy::Staff,
                        actor_id,
                        now,
                    )
                    .await
            }
            Err(e) => Err(e),
        };

        match outcome {
            Ok(enrollment) => enrolled.push(enrollment),
            Err(e) => failed.push(failure(item, &e)),
        }
    }

    BulkEnrollResponse { enrolled, failed }
}

pub async fn bulk_enroll(request: &HttpRequest, body: BulkEnrollRequest) -> ActixResult<HttpResponse> {
    let max_items = AppConfig::get().schedule.bulk_max_items;
    if body.items.is_empty() {
        return Ok(bad_request(ErrorCode::ValidationFailed, "items must not be empty"));
    }
    if body.items.len() > max_items {
        return Ok(bad_request(
            ErrorCode::ValidationFailed,
            format!("At most {max_items} items are allowed per request"),
        ));
    }

    let actor = current_user(request)?;
    let storage = storage_from_request(request)?;
    let now = clock_from_request(request).now();

    let result = enroll_items(&storage, &body.items, actor.id, now).await;

    info!(
        "Bulk enrollment by {}: {} enrolled, {} failed",
        actor.id,
        result.enrolled.len(),
        result.failed.len()
    );

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        result,
        "Bulk enrollment processed",
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_uses_stable_reason() {
        let item = BulkEnrollItem {
            occurrence_id: 10,
            user_id: 20,
        };
        let f = failure(&item, &AcademyError::capacity_exceeded("Occurrence 10 is full"));
        assert_eq!(f.code, "CAPACITY_EXCEEDED");
        assert_eq!(f.occurrence_id, 10);

        let f = failure(&item, &AcademyError::not_found("User 20 not found"));
        assert_eq!(f.code, "NOT_FOUND");
    }
}
