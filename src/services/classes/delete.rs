use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use crate::models::ApiResponse;
use crate::services::storage_from_request;

pub async fn delete_class(request: &HttpRequest, class_id: i64) -> ActixResult<HttpResponse> {
    let storage = storage_from_request(request)?;

    if storage.get_class_by_id(class_id).await?.is_none() {
        return Ok(super::class_not_found());
    }

    // 已停用的课程重复删除视为成功
    if storage.deactivate_class(class_id).await? {
        info!("Class {} deactivated", class_id);
    }

    Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Class deactivated successfully")))
}
