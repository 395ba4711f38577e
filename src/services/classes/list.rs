use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::models::{
    ApiResponse,
    classes::requests::{ClassListQuery, ClassQueryParams},
};
use crate::services::storage_from_request;

pub async fn list_classes(
    request: &HttpRequest,
    query: ClassQueryParams,
) -> ActixResult<HttpResponse> {
    let storage = storage_from_request(request)?;

    let list_query = ClassListQuery {
        page: Some(query.pagination.page),
        size: Some(query.pagination.size),
        sport: query.sport,
        status: query.status,
        search: query.search,
    };

    let response = storage.list_classes_with_pagination(list_query).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        response,
        "Class list retrieved successfully",
    )))
}
