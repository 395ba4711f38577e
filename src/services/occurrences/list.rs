use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::config::AppConfig;
use crate::models::{
    ApiResponse, ErrorCode,
    occurrences::{
        expander::local_day_bounds,
        requests::{OccurrenceListParams, OccurrenceListQuery},
    },
};
use crate::services::{bad_request, storage_from_request};

/// 日期过滤按场馆本地日期解释，`date_to` 含当天
pub(crate) fn to_list_query(params: OccurrenceListParams) -> Result<OccurrenceListQuery, String> {
    if let (Some(from), Some(to)) = (params.date_from, params.date_to)
        && to < from
    {
        return Err(format!("date_to ({to}) must not be before date_from ({from})"));
    }

    let offset = AppConfig::get().schedule.utc_offset();
    Ok(OccurrenceListQuery {
        page: Some(params.pagination.page),
        size: Some(params.pagination.size),
        class_id: params.class_id,
        instructor_id: params.instructor_id,
        venue_id: params.venue_id,
        status: params.status,
        starts_from: params.date_from.map(|d| local_day_bounds(d, offset).0),
        starts_before: params.date_to.map(|d| local_day_bounds(d, offset).1),
    })
}

pub async fn list_occurrences(
    request: &HttpRequest,
    params: OccurrenceListParams,
) -> ActixResult<HttpResponse> {
    let query = match to_list_query(params) {
        Ok(query) => query,
        Err(msg) => return Ok(bad_request(ErrorCode::ValidationFailed, msg)),
    };

    let storage = storage_from_request(request)?;
    let response = storage.list_occurrences_with_pagination(query).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        response,
        "Occurrence list retrieved successfully",
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PaginationQuery;
    use chrono::NaiveDate;

    fn params(from: Option<NaiveDate>, to: Option<NaiveDate>) -> OccurrenceListParams {
        OccurrenceListParams {
            pagination: PaginationQuery::default(),
            class_id: Some(3),
            instructor_id: None,
            venue_id: None,
            status: None,
            date_from: from,
            date_to: to,
        }
    }

    #[test]
    fn test_date_filters_cover_whole_local_days() {
        let day = NaiveDate::from_ymd_opt(2025, 3, 4).unwrap();
        let query = to_list_query(params(Some(day), Some(day))).unwrap();
        let (from, before) = (query.starts_from.unwrap(), query.starts_before.unwrap());
        assert_eq!(before - from, 86_400);
        assert_eq!(query.class_id, Some(3));
    }

    #[test]
    fn test_inverted_dates_rejected() {
        let from = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        let to = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        assert!(to_list_query(params(Some(from), Some(to))).is_err());
    }
}
