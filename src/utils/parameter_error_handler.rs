use actix_web::{
    HttpRequest, HttpResponse,
    error::{InternalError, JsonPayloadError, QueryPayloadError},
};
use tracing::debug;

use crate::models::{ApiResponse, ErrorCode};

fn bad_request(kind: &str, detail: String) -> actix_web::Error {
    debug!("Rejected {} payload: {}", kind, detail);
    let response = HttpResponse::BadRequest().json(ApiResponse::error_empty(
        ErrorCode::BadRequest,
        format!("Invalid {kind}: {detail}"),
    ));
    InternalError::from_response(detail, response).into()
}

/// JSON 请求体解析失败
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    bad_request("request body", err.to_string())
}

/// 查询参数解析失败
pub fn query_error_handler(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    bad_request("query parameters", err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_error_is_bad_request() {
        let req = actix_web::test::TestRequest::default().to_http_request();
        let err = query_error_handler(
            QueryPayloadError::Deserialize(serde::de::Error::custom("bad date")),
            &req,
        );
        assert_eq!(
            err.error_response().status(),
            actix_web::http::StatusCode::BAD_REQUEST
        );
    }
}
