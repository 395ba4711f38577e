use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::models::{
    ApiResponse, ErrorCode,
    schedules::{requests::ScheduleSlotListParams, responses::ScheduleSlotListResponse},
};
use crate::services::storage_from_request;

pub async fn list_slots(
    request: &HttpRequest,
    class_id: i64,
    params: ScheduleSlotListParams,
) -> ActixResult<HttpResponse> {
    let storage = storage_from_request(request)?;

    if storage.get_class_by_id(class_id).await?.is_none() {
        return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::ClassNotFound,
            "Class not found",
        )));
    }

    let items = storage
        .list_schedule_slots(class_id, params.include_inactive)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        ScheduleSlotListResponse { items },
        "Schedule slots retrieved successfully",
    )))
}
