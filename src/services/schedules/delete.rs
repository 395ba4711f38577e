use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use crate::models::{ApiResponse, ErrorCode};
use crate::services::storage_from_request;

// 停用排课，已生成的场次保留
pub async fn delete_slot(
    request: &HttpRequest,
    class_id: i64,
    slot_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = storage_from_request(request)?;

    if storage.get_schedule_slot(class_id, slot_id).await?.is_none() {
        return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::ScheduleSlotNotFound,
            "Schedule slot not found",
        )));
    }

    if storage.deactivate_schedule_slot(class_id, slot_id).await? {
        info!("Schedule slot {} of class {} deactivated", slot_id, class_id);
    }

    Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
        "Schedule slot deactivated successfully",
    )))
}
