//! SeaORM 存储实现
//!
//! 统一的数据库存储层，支持 SQLite、PostgreSQL 和 MySQL。

mod classes;
mod enrollments;
mod occurrences;
mod schedules;
mod users;
mod venues;

#[cfg(test)]
mod scenario_tests;

use crate::config::AppConfig;
use crate::errors::{AcademyError, Result};
use chrono::FixedOffset;
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr, SqlErr};
use std::time::Duration;
use tracing::info;

/// 比较并交换失败后的最大重试次数
pub(crate) const MAX_CAS_RETRIES: usize = 16;

/// SeaORM 存储实现
#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) db: DatabaseConnection,
    // 场馆本地时区，用于把排课的本地时间换算为 UTC
    pub(crate) utc_offset: FixedOffset,
}

impl SeaOrmStorage {
    /// 根据全局配置创建存储实例
    pub async fn new_async() -> Result<Self> {
        let config = AppConfig::get();
        Self::connect(
            &config.database.url,
            config.database.pool_size,
            config.database.timeout,
            config.schedule.utc_offset(),
        )
        .await
    }

    /// 连接数据库并运行迁移
    pub async fn connect(
        url: &str,
        pool_size: u32,
        timeout: u64,
        utc_offset: FixedOffset,
    ) -> Result<Self> {
        let db_url = Self::build_database_url(url)?;

        // 根据数据库类型选择连接方式
        let db = if db_url.starts_with("sqlite:") {
            Self::connect_sqlite(&db_url, pool_size, timeout).await?
        } else {
            Self::connect_generic(&db_url, pool_size, timeout).await?
        };

        // 运行迁移
        Migrator::up(&db, None)
            .await
            .map_err(|e| AcademyError::database_operation(format!("数据库迁移失败: {e}")))?;

        info!("SeaORM 存储初始化完成，数据库: {}", db_url);

        Ok(Self { db, utc_offset })
    }

    /// SQLite 专用连接（WAL + pragma 优化）
    async fn connect_sqlite(url: &str, pool_size: u32, timeout: u64) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
        };
        use std::str::FromStr;

        let opt = SqliteConnectOptions::from_str(url)
            .map_err(|e| AcademyError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5))
            .pragma("cache_size", "-64000")
            .pragma("temp_store", "memory")
            .pragma("wal_autocheckpoint", "1000");

        let pool = SqlitePoolOptions::new()
            .max_connections(pool_size.max(1))
            .min_connections(1)
            .acquire_timeout(Duration::from_secs(timeout))
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(opt)
            .await
            .map_err(|e| AcademyError::database_connection(format!("SQLite 连接失败: {e}")))?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 通用连接（PostgreSQL、MySQL 等）
    async fn connect_generic(url: &str, pool_size: u32, timeout: u64) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(pool_size)
            .min_connections(1)
            .connect_timeout(Duration::from_secs(timeout))
            .acquire_timeout(Duration::from_secs(timeout))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(false)
            .sqlx_logging_level(tracing::log::LevelFilter::Debug);

        Database::connect(opt)
            .await
            .map_err(|e| AcademyError::database_connection(format!("无法连接到数据库: {e}")))
    }

    /// 从 URL 自动推断数据库类型并构建连接 URL
    fn build_database_url(url: &str) -> Result<String> {
        if url.starts_with("sqlite:") {
            Ok(url.to_string())
        } else if url == ":memory:" {
            Ok("sqlite::memory:".to_string())
        } else if url.ends_with(".db") || url.ends_with(".sqlite") {
            Ok(format!("sqlite://{url}?mode=rwc"))
        } else if url.starts_with("postgres://")
            || url.starts_with("postgresql://")
            || url.starts_with("mysql://")
            || url.starts_with("mariadb://")
        {
            Ok(url.to_string())
        } else {
            Err(AcademyError::database_config(format!(
                "无法从 URL 推断数据库类型: {url}. 支持: sqlite://, postgres://, mysql://, 或 .db/.sqlite 文件路径"
            )))
        }
    }
}

/// 是否为唯一约束冲突
pub(crate) fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

// Storage trait 实现
use crate::models::{
    classes::{
        entities::ClassDefinition,
        requests::{ClassListQuery, CreateClassRequest, UpdateClassRequest},
        responses::ClassListResponse,
    },
    enrollments::{
        entities::{CancellationActor, Enrollment, EnrollmentPolicy, EnrollmentStatus},
        responses::{MyEnrollmentListResponse, OccurrenceEnrollmentsResponse},
    },
    occurrences::{
        entities::Occurrence,
        requests::{OccurrenceListQuery, UpdateOccurrenceRequest},
        responses::{GenerateOccurrencesResponse, OccurrenceListResponse},
    },
    schedules::{entities::ScheduleSlot, requests::CreateScheduleSlotRequest},
    users::{
        entities::User,
        requests::{CreateUserRequest, UpdateUserRequest, UserListQuery},
        responses::UserListResponse,
    },
    venues::{
        entities::Venue,
        requests::{CreateVenueRequest, UpdateVenueRequest, VenueListParams},
        responses::VenueListResponse,
    },
};
use crate::storage::Storage;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

#[async_trait]
impl Storage for SeaOrmStorage {
    // 用户模块
    async fn create_user(&self, user: CreateUserRequest) -> Result<User> {
        self.create_user_impl(user).await
    }

    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>> {
        self.get_user_by_id_impl(id).await
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        self.get_user_by_username_impl(username).await
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.get_user_by_email_impl(email).await
    }

    async fn get_user_by_username_or_email(&self, identifier: &str) -> Result<Option<User>> {
        self.get_user_by_username_or_email_impl(identifier).await
    }

    async fn list_users_with_pagination(&self, query: UserListQuery) -> Result<UserListResponse> {
        self.list_users_with_pagination_impl(query).await
    }

    async fn update_user(&self, id: i64, update: UpdateUserRequest) -> Result<Option<User>> {
        self.update_user_impl(id, update).await
    }

    async fn update_last_login(&self, id: i64) -> Result<bool> {
        self.update_last_login_impl(id).await
    }

    async fn count_users(&self) -> Result<u64> {
        self.count_users_impl().await
    }

    // 场地模块
    async fn create_venue(&self, venue: CreateVenueRequest) -> Result<Venue> {
        self.create_venue_impl(venue).await
    }

    async fn get_venue_by_id(&self, id: i64) -> Result<Option<Venue>> {
        self.get_venue_by_id_impl(id).await
    }

    async fn list_venues_with_pagination(
        &self,
        query: VenueListParams,
    ) -> Result<VenueListResponse> {
        self.list_venues_with_pagination_impl(query).await
    }

    async fn update_venue(&self, id: i64, update: UpdateVenueRequest) -> Result<Option<Venue>> {
        self.update_venue_impl(id, update).await
    }

    // 课程模块
    async fn create_class(&self, class: CreateClassRequest) -> Result<ClassDefinition> {
        self.create_class_impl(class).await
    }

    async fn get_class_by_id(&self, class_id: i64) -> Result<Option<ClassDefinition>> {
        self.get_class_by_id_impl(class_id).await
    }

    async fn list_classes_with_pagination(
        &self,
        query: ClassListQuery,
    ) -> Result<ClassListResponse> {
        self.list_classes_with_pagination_impl(query).await
    }

    async fn update_class(
        &self,
        class_id: i64,
        update: UpdateClassRequest,
    ) -> Result<Option<ClassDefinition>> {
        self.update_class_impl(class_id, update).await
    }

    async fn deactivate_class(&self, class_id: i64) -> Result<bool> {
        self.deactivate_class_impl(class_id).await
    }

    // 排课模块
    async fn create_schedule_slot(
        &self,
        class_id: i64,
        slot: CreateScheduleSlotRequest,
    ) -> Result<ScheduleSlot> {
        self.create_schedule_slot_impl(class_id, slot).await
    }

    async fn get_schedule_slot(
        &self,
        class_id: i64,
        slot_id: i64,
    ) -> Result<Option<ScheduleSlot>> {
        self.get_schedule_slot_impl(class_id, slot_id).await
    }

    async fn list_schedule_slots(
        &self,
        class_id: i64,
        include_inactive: bool,
    ) -> Result<Vec<ScheduleSlot>> {
        self.list_schedule_slots_impl(class_id, include_inactive)
            .await
    }

    async fn deactivate_schedule_slot(&self, class_id: i64, slot_id: i64) -> Result<bool> {
        self.deactivate_schedule_slot_impl(class_id, slot_id).await
    }

    // 场次模块
    async fn generate_occurrences(
        &self,
        class_id: i64,
        range_start: NaiveDate,
        range_end: NaiveDate,
        now: DateTime<Utc>,
    ) -> Result<GenerateOccurrencesResponse> {
        self.generate_occurrences_impl(class_id, range_start, range_end, now)
            .await
    }

    async fn get_occurrence_by_id(&self, id: i64) -> Result<Option<Occurrence>> {
        self.get_occurrence_by_id_impl(id).await
    }

    async fn list_occurrences_with_pagination(
        &self,
        query: OccurrenceListQuery,
    ) -> Result<OccurrenceListResponse> {
        self.list_occurrences_with_pagination_impl(query).await
    }

    async fn update_occurrence(
        &self,
        id: i64,
        update: UpdateOccurrenceRequest,
    ) -> Result<Occurrence> {
        self.update_occurrence_impl(id, update).await
    }

    async fn confirm_occurrence(&self, id: i64) -> Result<Occurrence> {
        self.confirm_occurrence_impl(id).await
    }

    async fn cancel_occurrence(
        &self,
        id: i64,
        actor_id: i64,
        now: DateTime<Utc>,
    ) -> Result<Occurrence> {
        self.cancel_occurrence_impl(id, actor_id, now).await
    }

    // 报名模块
    async fn enroll(
        &self,
        occurrence_id: i64,
        user_id: i64,
        policy: EnrollmentPolicy,
        actor_id: i64,
        now: DateTime<Utc>,
    ) -> Result<Enrollment> {
        self.enroll_impl(occurrence_id, user_id, policy, actor_id, now)
            .await
    }

    async fn get_enrollment_by_id(&self, id: i64) -> Result<Option<Enrollment>> {
        self.get_enrollment_by_id_impl(id).await
    }

    async fn cancel_enrollment(
        &self,
        enrollment_id: i64,
        actor: CancellationActor,
        now: DateTime<Utc>,
    ) -> Result<Enrollment> {
        self.cancel_enrollment_impl(enrollment_id, actor, now).await
    }

    async fn list_occurrence_enrollments(
        &self,
        occurrence_id: i64,
        include_cancelled: bool,
    ) -> Result<OccurrenceEnrollmentsResponse> {
        self.list_occurrence_enrollments_impl(occurrence_id, include_cancelled)
            .await
    }

    async fn list_user_enrollments(
        &self,
        user_id: i64,
        status: Option<EnrollmentStatus>,
        page: Option<i64>,
        size: Option<i64>,
    ) -> Result<MyEnrollmentListResponse> {
        self.list_user_enrollments_impl(user_id, status, page, size)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_database_url() {
        assert_eq!(
            SeaOrmStorage::build_database_url("academy.db").unwrap(),
            "sqlite://academy.db?mode=rwc"
        );
        assert_eq!(
            SeaOrmStorage::build_database_url(":memory:").unwrap(),
            "sqlite::memory:"
        );
        assert_eq!(
            SeaOrmStorage::build_database_url("postgres://u:p@localhost/academy").unwrap(),
            "postgres://u:p@localhost/academy"
        );
        assert!(SeaOrmStorage::build_database_url("redis://localhost").is_err());
    }
}
