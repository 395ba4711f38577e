pub mod generate;
pub mod get;
pub mod list;
pub mod status;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::models::occurrences::requests::{
    GenerateOccurrencesRequest, OccurrenceListParams, UpdateOccurrenceRequest,
};
use crate::models::{ApiResponse, ErrorCode};

pub struct OccurrenceService;

impl OccurrenceService {
    pub fn new_lazy() -> Self {
        Self
    }

    // 按排课展开生成场次
    pub async fn generate(
        &self,
        request: &HttpRequest,
        body: GenerateOccurrencesRequest,
    ) -> ActixResult<HttpResponse> {
        generate::generate_occurrences(request, body).await
    }

    pub async fn list(
        &self,
        request: &HttpRequest,
        params: OccurrenceListParams,
    ) -> ActixResult<HttpResponse> {
        list::list_occurrences(request, params).await
    }

    pub async fn get(&self, request: &HttpRequest, id: i64) -> ActixResult<HttpResponse> {
        get::get_occurrence(request, id).await
    }

    pub async fn update(
        &self,
        request: &HttpRequest,
        id: i64,
        body: UpdateOccurrenceRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_occurrence(request, id, body).await
    }

    pub async fn confirm(&self, request: &HttpRequest, id: i64) -> ActixResult<HttpResponse> {
        status::confirm_occurrence(request, id).await
    }

    // 取消场次，级联取消全部有效报名
    pub async fn cancel(&self, request: &HttpRequest, id: i64) -> ActixResult<HttpResponse> {
        status::cancel_occurrence(request, id).await
    }
}

fn occurrence_not_found(id: i64) -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::error_empty(
        ErrorCode::OccurrenceNotFound,
        format!("Occurrence {id} not found"),
    ))
}
