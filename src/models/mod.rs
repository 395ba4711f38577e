//! 数据模型定义
//!
//! 包括 HTTP 请求/响应结构、业务实体以及统一的错误码。

pub mod auth;
pub mod classes;
pub mod common;
pub mod enrollments;
pub mod occurrences;
pub mod schedules;
pub mod users;
pub mod venues;

pub use common::{ApiResponse, PaginatedResponse, PaginationInfo, PaginationQuery};

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// 程序启动时间
#[derive(Debug, Clone)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}

/// 业务错误码
///
/// `code` 字段使用数值，`error` 字段使用 [`ErrorCode::reason`] 给出的稳定字符串，
/// 供前端按原因分支处理（例如名额已满时禁用报名按钮）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/api.ts")]
pub enum ErrorCode {
    Success = 0,

    // 通用错误
    BadRequest = 1000,
    ValidationFailed = 1001,
    Unauthorized = 1002,
    Forbidden = 1003,
    NotFound = 1004,
    Conflict = 1005,
    RateLimitExceeded = 1006,
    InternalServerError = 1007,

    // 认证
    AuthFailed = 2000,

    // 用户
    UserNotFound = 3000,
    UserAlreadyExists = 3001,
    UserNameInvalid = 3002,
    UserEmailInvalid = 3003,
    UserPasswordInvalid = 3004,
    UserInactive = 3006,

    // 场地
    VenueNotFound = 4000,
    VenueAlreadyExists = 4001,

    // 课程与排课
    ClassNotFound = 5000,
    ClassInactive = 5001,
    ScheduleSlotNotFound = 5100,
    ScheduleSlotConflict = 5101,
    InstructorInvalid = 5102,

    // 场次
    OccurrenceNotFound = 6000,
    OccurrenceInvalidStatus = 6001,
    OccurrenceInPast = 6002,

    // 报名
    EnrollmentNotFound = 7000,
    AlreadyEnrolled = 7001,
    CapacityExceeded = 7002,
    EnrollmentPermissionDenied = 7003,
}

impl ErrorCode {
    /// 机器可读的错误原因
    pub fn reason(&self) -> &'static str {
        match self {
            ErrorCode::Success => "OK",
            ErrorCode::BadRequest => "BAD_REQUEST",
            ErrorCode::ValidationFailed
            | ErrorCode::UserNameInvalid
            | ErrorCode::UserEmailInvalid
            | ErrorCode::UserPasswordInvalid
            | ErrorCode::InstructorInvalid => "VALIDATION_ERROR",
            ErrorCode::Unauthorized | ErrorCode::AuthFailed => "UNAUTHORIZED",
            ErrorCode::Forbidden | ErrorCode::EnrollmentPermissionDenied => "FORBIDDEN",
            ErrorCode::NotFound
            | ErrorCode::UserNotFound
            | ErrorCode::VenueNotFound
            | ErrorCode::ClassNotFound
            | ErrorCode::ScheduleSlotNotFound
            | ErrorCode::OccurrenceNotFound
            | ErrorCode::EnrollmentNotFound => "NOT_FOUND",
            ErrorCode::Conflict
            | ErrorCode::UserAlreadyExists
            | ErrorCode::VenueAlreadyExists
            | ErrorCode::ScheduleSlotConflict => "CONFLICT",
            ErrorCode::RateLimitExceeded => "RATE_LIMITED",
            ErrorCode::InternalServerError => "INTERNAL_ERROR",
            ErrorCode::ClassInactive
            | ErrorCode::UserInactive
            | ErrorCode::OccurrenceInvalidStatus => "INVALID_STATUS",
            ErrorCode::OccurrenceInPast => "PAST_OCCURRENCE",
            ErrorCode::AlreadyEnrolled => "ALREADY_ENROLLED",
            ErrorCode::CapacityExceeded => "CAPACITY_EXCEEDED",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enrollment_reasons_are_stable() {
        assert_eq!(ErrorCode::CapacityExceeded.reason(), "CAPACITY_EXCEEDED");
        assert_eq!(ErrorCode::AlreadyEnrolled.reason(), "ALREADY_ENROLLED");
        assert_eq!(ErrorCode::OccurrenceInvalidStatus.reason(), "INVALID_STATUS");
        assert_eq!(ErrorCode::OccurrenceInPast.reason(), "PAST_OCCURRENCE");
    }

    #[test]
    fn test_numeric_codes() {
        assert_eq!(ErrorCode::Success as i32, 0);
        assert_eq!(ErrorCode::CapacityExceeded as i32, 7002);
    }
}
