use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::models::ApiResponse;
use crate::services::storage_from_request;

pub async fn get_occurrence(request: &HttpRequest, id: i64) -> ActixResult<HttpResponse> {
    let storage = storage_from_request(request)?;

    match storage.get_occurrence_by_id(id).await? {
        Some(occurrence) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            occurrence,
            "Occurrence retrieved successfully",
        ))),
        None => Ok(super::occurrence_not_found(id)),
    }
}
