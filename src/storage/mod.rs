use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};

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

use crate::errors::Result;

pub mod sea_orm_storage;

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 用户管理方法
    // 创建用户
    async fn create_user(&self, user: CreateUserRequest) -> Result<User>;
    // 通过ID获取用户信息
    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>>;
    // 通过用户名获取用户信息
    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>>;
    // 通过邮箱获取用户信息
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;
    // 通过用户名或邮箱获取用户信息
    async fn get_user_by_username_or_email(&self, identifier: &str) -> Result<Option<User>>;
    // 列出用户
    async fn list_users_with_pagination(&self, query: UserListQuery) -> Result<UserListResponse>;
    // 更新用户信息
    async fn update_user(&self, id: i64, update: UpdateUserRequest) -> Result<Option<User>>;
    // 更新用户最后登录时间
    async fn update_last_login(&self, id: i64) -> Result<bool>;
    // 统计用户数量
    async fn count_users(&self) -> Result<u64>;

    /// 场地管理方法
    async fn create_venue(&self, venue: CreateVenueRequest) -> Result<Venue>;
    async fn get_venue_by_id(&self, id: i64) -> Result<Option<Venue>>;
    async fn list_venues_with_pagination(
        &self,
        query: VenueListParams,
    ) -> Result<VenueListResponse>;
    async fn update_venue(&self, id: i64, update: UpdateVenueRequest) -> Result<Option<Venue>>;

    /// 课程管理方法
    // 创建课程
    async fn create_class(&self, class: CreateClassRequest) -> Result<ClassDefinition>;
    // 通过ID获取课程
    async fn get_class_by_id(&self, class_id: i64) -> Result<Option<ClassDefinition>>;
    // 列出课程
    async fn list_classes_with_pagination(
        &self,
        query: ClassListQuery,
    ) -> Result<ClassListResponse>;
    // 更新课程
    async fn update_class(
        &self,
        class_id: i64,
        update: UpdateClassRequest,
    ) -> Result<Option<ClassDefinition>>;
    // 停用课程（逻辑删除）
    async fn deactivate_class(&self, class_id: i64) -> Result<bool>;

    /// 每周排课方法
    // 新增排课，同一课程的启用排课不能有相同的星期和开始时间
    async fn create_schedule_slot(
        &self,
        class_id: i64,
        slot: CreateScheduleSlotRequest,
    ) -> Result<ScheduleSlot>;
    async fn get_schedule_slot(&self, class_id: i64, slot_id: i64)
    -> Result<Option<ScheduleSlot>>;
    async fn list_schedule_slots(
        &self,
        class_id: i64,
        include_inactive: bool,
    ) -> Result<Vec<ScheduleSlot>>;
    // 停用排课（逻辑删除）
    async fn deactivate_schedule_slot(&self, class_id: i64, slot_id: i64) -> Result<bool>;

    /// 场次方法
    // 在日期区间内展开排课生成场次，整体在一个事务中完成
    async fn generate_occurrences(
        &self,
        class_id: i64,
        range_start: NaiveDate,
        range_end: NaiveDate,
        now: DateTime<Utc>,
    ) -> Result<GenerateOccurrencesResponse>;
    async fn get_occurrence_by_id(&self, id: i64) -> Result<Option<Occurrence>>;
    async fn list_occurrences_with_pagination(
        &self,
        query: OccurrenceListQuery,
    ) -> Result<OccurrenceListResponse>;
    // 调整场次的教练或场地
    async fn update_occurrence(
        &self,
        id: i64,
        update: UpdateOccurrenceRequest,
    ) -> Result<Occurrence>;
    // scheduled -> confirmed
    async fn confirm_occurrence(&self, id: i64) -> Result<Occurrence>;
    // 取消场次并级联取消其下所有有效报名
    async fn cancel_occurrence(
        &self,
        id: i64,
        actor_id: i64,
        now: DateTime<Utc>,
    ) -> Result<Occurrence>;

    /// 报名方法
    // 名额闸门：状态、时间、重复、容量依次检查后写入
    async fn enroll(
        &self,
        occurrence_id: i64,
        user_id: i64,
        policy: EnrollmentPolicy,
        actor_id: i64,
        now: DateTime<Utc>,
    ) -> Result<Enrollment>;
    async fn get_enrollment_by_id(&self, id: i64) -> Result<Option<Enrollment>>;
    async fn cancel_enrollment(
        &self,
        enrollment_id: i64,
        actor: CancellationActor,
        now: DateTime<Utc>,
    ) -> Result<Enrollment>;
    // 场次的报名名单与名额信息
    async fn list_occurrence_enrollments(
        &self,
        occurrence_id: i64,
        include_cancelled: bool,
    ) -> Result<OccurrenceEnrollmentsResponse>;
    // 用户自己的报名
    async fn list_user_enrollments(
        &self,
        user_id: i64,
        status: Option<EnrollmentStatus>,
        page: Option<i64>,
        size: Option<i64>,
    ) -> Result<MyEnrollmentListResponse>;
}

pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}
