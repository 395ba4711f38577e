//! SeaORM 实体定义
//!
//! 这些实体用于数据库操作，与 models 模块中的业务实体分离。
//! Storage 层使用这些实体进行 CRUD 操作，然后转换为 models 中的业务实体。

pub mod prelude;

pub mod class_definitions;
pub mod class_enrollments;
pub mod class_occurrences;
pub mod schedule_slots;
pub mod users;
pub mod venues;

use chrono::{DateTime, Utc};

/// 秒级时间戳转 UTC 时间
pub(crate) fn ts(value: i64) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(value, 0).unwrap_or_default()
}
