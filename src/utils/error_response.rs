//! 业务错误到 HTTP 响应的映射

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use tracing::error;

use crate::errors::AcademyError;
use crate::models::{ApiResponse, ErrorCode};

/// 错误对应的 HTTP 状态码与业务错误码
///
/// `not_found` 用于替换通用的 [`ErrorCode::NotFound`]，便于前端区分资源类型。
pub fn classify(err: &AcademyError, not_found: ErrorCode) -> (StatusCode, ErrorCode) {
    match err {
        AcademyError::Validation(_) | AcademyError::DateParse(_) => {
            (StatusCode::BAD_REQUEST, ErrorCode::ValidationFailed)
        }
        AcademyError::NotFound(_) => (StatusCode::NOT_FOUND, not_found),
        AcademyError::InvalidState(_) => {
            (StatusCode::BAD_REQUEST, ErrorCode::OccurrenceInvalidStatus)
        }
        AcademyError::PastOccurrence(_) => (StatusCode::BAD_REQUEST, ErrorCode::OccurrenceInPast),
        AcademyError::AlreadyEnrolled(_) => (StatusCode::CONFLICT, ErrorCode::AlreadyEnrolled),
        AcademyError::CapacityExceeded(_) => (StatusCode::CONFLICT, ErrorCode::CapacityExceeded),
        AcademyError::Conflict(_) => (StatusCode::CONFLICT, ErrorCode::Conflict),
        AcademyError::Authorization(_) => (StatusCode::FORBIDDEN, ErrorCode::Forbidden),
        AcademyError::Authentication(_) => (StatusCode::UNAUTHORIZED, ErrorCode::Unauthorized),
        _ => (
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorCode::InternalServerError,
        ),
    }
}

pub fn error_response(err: &AcademyError) -> HttpResponse {
    error_response_with(err, ErrorCode::NotFound)
}

pub fn error_response_with(err: &AcademyError, not_found: ErrorCode) -> HttpResponse {
    let (status, code) = classify(err, not_found);
    if status.is_server_error() {
        error!("{}", err);
    }
    HttpResponse::build(status).json(ApiResponse::error_empty(code, err.message()))
}

// 处理程序中可以直接对存储层结果使用 `?`
impl ResponseError for AcademyError {
    fn status_code(&self) -> StatusCode {
        classify(self, ErrorCode::NotFound).0
    }

    fn error_response(&self) -> HttpResponse {
        error_response(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enrollment_errors_map_to_conflict() {
        let (status, code) = classify(
            &AcademyError::capacity_exceeded("full"),
            ErrorCode::NotFound,
        );
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(code, ErrorCode::CapacityExceeded);

        let (status, code) = classify(&AcademyError::already_enrolled("dup"), ErrorCode::NotFound);
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(code, ErrorCode::AlreadyEnrolled);
    }

    #[test]
    fn test_state_errors_are_bad_request() {
        assert_eq!(
            classify(&AcademyError::invalid_state("x"), ErrorCode::NotFound),
            (StatusCode::BAD_REQUEST, ErrorCode::OccurrenceInvalidStatus)
        );
        assert_eq!(
            classify(&AcademyError::past_occurrence("x"), ErrorCode::NotFound),
            (StatusCode::BAD_REQUEST, ErrorCode::OccurrenceInPast)
        );
    }

    #[test]
    fn test_not_found_override() {
        let (status, code) = classify(
            &AcademyError::not_found("missing"),
            ErrorCode::OccurrenceNotFound,
        );
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(code, ErrorCode::OccurrenceNotFound);
    }

    #[test]
    fn test_response_error_status() {
        let err: actix_web::Error = AcademyError::authorization("not yours").into();
        assert_eq!(err.as_response_error().status_code(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_database_errors_are_internal() {
        let resp = error_response(&AcademyError::database_operation("boom"));
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
