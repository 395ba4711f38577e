//! 报名存储操作
//!
//! 名额由 `class_occurrences.enrolled_count` 计数器控制，计数器只通过比较并交换更新：
//! `UPDATE ... SET enrolled_count = n + 1 WHERE id = ? AND enrolled_count = n AND status IN (...)`。
//! 竞争失败时重新读取并重试；`(occurrence_id, active_user_id)` 唯一索引兜底重复报名。

use std::collections::HashMap;

use super::{MAX_CAS_RETRIES, SeaOrmStorage};
use crate::entity::class_definitions::Entity as ClassDefinitions;
use crate::entity::class_enrollments::{ActiveModel, Column, Entity as ClassEnrollments};
use crate::entity::class_occurrences::{
    ActiveModel as OccurrenceActiveModel, Column as OccurrenceColumn, Entity as ClassOccurrences,
    Model as OccurrenceModel,
};
use crate::errors::{AcademyError, Result};
use crate::models::{
    PaginationInfo,
    common::normalize_page,
    enrollments::{
        entities::{CancellationActor, Enrollment, EnrollmentPolicy, EnrollmentStatus},
        responses::{
            EnrollmentMeta, MyEnrollment, MyEnrollmentListResponse, OccurrenceEnrollmentsResponse,
        },
    },
};
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseTransaction, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use tracing::{debug, info};

impl SeaOrmStorage {
    async fn find_occurrence_model(&self, id: i64) -> Result<OccurrenceModel> {
        ClassOccurrences::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| AcademyError::database_operation(format!("查询场次失败: {e}")))?
            .ok_or_else(|| AcademyError::not_found(format!("Occurrence {id} not found")))
    }

    /// 在调用方事务内读取容量，与计数器更新处于同一事务
    async fn class_capacity<C: ConnectionTrait>(conn: &C, class_id: i64) -> Result<i32> {
        ClassDefinitions::find_by_id(class_id)
            .one(conn)
            .await
            .map_err(|e| AcademyError::database_operation(format!("查询课程失败: {e}")))?
            .map(|c| c.capacity_max)
            .ok_or_else(|| AcademyError::not_found(format!("Class {class_id} not found")))
    }

    async fn begin_txn(&self) -> Result<DatabaseTransaction> {
        self.db
            .begin()
            .await
            .map_err(|e| AcademyError::database_operation(format!("开启事务失败: {e}")))
    }

    /// 报名
    ///
    /// 检查顺序：场次存在、状态可接受、（自助）尚未开始、无重复有效报名、名额未满。
    pub async fn enroll_impl(
        &self,
        occurrence_id: i64,
        user_id: i64,
        policy: EnrollmentPolicy,
        actor_id: i64,
        now: DateTime<Utc>,
    ) -> Result<Enrollment> {
        let now = now.timestamp();
        let accepted: Vec<String> = policy
            .accepted_statuses()
            .iter()
            .map(|s| s.to_string())
            .collect();

        for attempt in 0..MAX_CAS_RETRIES {
            let occurrence = self.find_occurrence_model(occurrence_id).await?;
            policy.check(&occurrence.clone().into_occurrence())?;

            let existing = ClassEnrollments::find()
                .filter(Column::OccurrenceId.eq(occurrence_id))
                .filter(Column::ActiveUserId.eq(user_id))
                .one(&self.db)
                .await
                .map_err(|e| AcademyError::database_operation(format!("查询报名失败: {e}")))?;
            if existing.is_some() {
                return Err(AcademyError::already_enrolled(format!(
                    "User {user_id} is already enrolled in occurrence {occurrence_id}"
                )));
            }

            let current = occurrence.enrolled_count;
            let txn = self.begin_txn().await?;

            // 下调容量不会剔除已有报名，只阻止新的报名
            let capacity = Self::class_capacity(&txn, occurrence.class_id).await?;
            if current >= capacity {
                txn.rollback()
                    .await
                    .map_err(|e| AcademyError::database_operation(format!("回滚事务失败: {e}")))?;
                return Err(AcademyError::capacity_exceeded(format!(
                    "Occurrence {occurrence_id} is full ({current}/{capacity})"
                )));
            }

            let swapped = ClassOccurrences::update_many()
                .set(OccurrenceActiveModel {
                    enrolled_count: Set(current + 1),
                    updated_at: Set(now),
                    ..Default::default()
                })
                .filter(OccurrenceColumn::Id.eq(occurrence_id))
                .filter(OccurrenceColumn::EnrolledCount.eq(current))
                .filter(OccurrenceColumn::Status.is_in(accepted.clone()))
                .exec(&txn)
                .await
                .map_err(|e| AcademyError::database_operation(format!("更新报名计数失败: {e}")))?;

            if swapped.rows_affected == 0 {
                txn.rollback()
                    .await
                    .map_err(|e| AcademyError::database_operation(format!("回滚事务失败: {e}")))?;
                debug!(
                    "Enrollment counter race on occurrence {} (attempt {}), retrying",
                    occurrence_id,
                    attempt + 1
                );
                continue;
            }

            let model = ActiveModel {
                occurrence_id: Set(occurrence_id),
                user_id: Set(user_id),
                status: Set(EnrollmentStatus::Enrolled.to_string()),
                active_user_id: Set(Some(user_id)),
                enrolled_by: Set(actor_id),
                enrolled_at: Set(now),
                cancelled_by: Set(None),
                cancelled_at: Set(None),
                updated_at: Set(now),
                ..Default::default()
            };

            let inserted = model.insert(&txn).await.map_err(|e| {
                if super::is_unique_violation(&e) {
                    AcademyError::already_enrolled(format!(
                        "User {user_id} is already enrolled in occurrence {occurrence_id}"
                    ))
                } else {
                    AcademyError::database_operation(format!("创建报名失败: {e}"))
                }
            })?;

            txn.commit()
                .await
                .map_err(|e| AcademyError::database_operation(format!("提交事务失败: {e}")))?;

            info!(
                "User {} enrolled in occurrence {} by {} ({}/{})",
                user_id,
                occurrence_id,
                actor_id,
                current + 1,
                capacity
            );
            return Ok(inserted.into_enrollment());
        }

        Err(AcademyError::conflict(format!(
            "Occurrence {occurrence_id} is under heavy contention, please retry"
        )))
    }

    pub async fn get_enrollment_by_id_impl(&self, id: i64) -> Result<Option<Enrollment>> {
        let result = ClassEnrollments::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| AcademyError::database_operation(format!("查询报名失败: {e}")))?;

        Ok(result.map(|m| m.into_enrollment()))
    }

    /// 取消报名：报名置为 cancelled 并释放名额，两步在同一事务中完成
    pub async fn cancel_enrollment_impl(
        &self,
        enrollment_id: i64,
        actor: CancellationActor,
        now: DateTime<Utc>,
    ) -> Result<Enrollment> {
        let now = now.timestamp();
        for attempt in 0..MAX_CAS_RETRIES {
            let enrollment = self
                .get_enrollment_by_id_impl(enrollment_id)
                .await?
                .ok_or_else(|| {
                    AcademyError::not_found(format!("Enrollment {enrollment_id} not found"))
                })?;
            let occurrence = self.find_occurrence_model(enrollment.occurrence_id).await?;
            actor.check(&enrollment, &occurrence.clone().into_occurrence())?;
            let next = enrollment.status.cancel()?;

            let current = occurrence.enrolled_count;
            let txn = self.begin_txn().await?;

            let released = ClassEnrollments::update_many()
                .set(ActiveModel {
                    status: Set(next.to_string()),
                    active_user_id: Set(None),
                    cancelled_by: Set(Some(actor.user_id())),
                    cancelled_at: Set(Some(now)),
                    updated_at: Set(now),
                    ..Default::default()
                })
                .filter(Column::Id.eq(enrollment_id))
                .filter(Column::Status.eq(EnrollmentStatus::Enrolled.to_string()))
                .exec(&txn)
                .await
                .map_err(|e| AcademyError::database_operation(format!("取消报名失败: {e}")))?;

            let swapped = if released.rows_affected == 0 {
                None
            } else {
                Some(
                    ClassOccurrences::update_many()
                        .set(OccurrenceActiveModel {
                            enrolled_count: Set((current - 1).max(0)),
                            updated_at: Set(now),
                            ..Default::default()
                        })
                        .filter(OccurrenceColumn::Id.eq(occurrence.id))
                        .filter(OccurrenceColumn::EnrolledCount.eq(current))
                        .exec(&txn)
                        .await
                        .map_err(|e| {
                            AcademyError::database_operation(format!("更新报名计数失败: {e}"))
                        })?,
                )
            };

            match swapped {
                Some(result) if result.rows_affected > 0 => {
                    txn.commit().await.map_err(|e| {
                        AcademyError::database_operation(format!("提交事务失败: {e}"))
                    })?;
                    info!(
                        "Enrollment {} cancelled by user {}",
                        enrollment_id,
                        actor.user_id()
                    );
                    return self.get_enrollment_by_id_impl(enrollment_id).await?.ok_or_else(
                        || AcademyError::not_found(format!("Enrollment {enrollment_id} not found")),
                    );
                }
                _ => {
                    txn.rollback().await.map_err(|e| {
                        AcademyError::database_operation(format!("回滚事务失败: {e}"))
                    })?;
                    debug!(
                        "Cancellation race on enrollment {} (attempt {}), retrying",
                        enrollment_id,
                        attempt + 1
                    );
                }
            }
        }

        Err(AcademyError::conflict(format!(
            "Enrollment {enrollment_id} is under heavy contention, please retry"
        )))
    }

    /// 场次的报名名单，附带名额信息
    pub async fn list_occurrence_enrollments_impl(
        &self,
        occurrence_id: i64,
        include_cancelled: bool,
    ) -> Result<OccurrenceEnrollmentsResponse> {
        let occurrence = self.find_occurrence_model(occurrence_id).await?;
        let capacity = Self::class_capacity(&self.db, occurrence.class_id).await?;

        let mut select = ClassEnrollments::find().filter(Column::OccurrenceId.eq(occurrence_id));
        if !include_cancelled {
            select = select.filter(Column::Status.eq(EnrollmentStatus::Enrolled.to_string()));
        }

        let rows = select
            .order_by_asc(Column::EnrolledAt)
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| AcademyError::database_operation(format!("查询报名列表失败: {e}")))?;

        Ok(OccurrenceEnrollmentsResponse {
            items: rows.into_iter().map(|m| m.into_enrollment()).collect(),
            meta: EnrollmentMeta::new(occurrence.into_occurrence(), capacity),
        })
    }

    /// 用户的报名，最近报名在前
    pub async fn list_user_enrollments_impl(
        &self,
        user_id: i64,
        status: Option<EnrollmentStatus>,
        page: Option<i64>,
        size: Option<i64>,
    ) -> Result<MyEnrollmentListResponse> {
        let (page, size) = normalize_page(page, size);

        let mut select = ClassEnrollments::find().filter(Column::UserId.eq(user_id));
        if let Some(status) = status {
            select = select.filter(Column::Status.eq(status.to_string()));
        }

        let paginator = select
            .order_by_desc(Column::EnrolledAt)
            .order_by_desc(Column::Id)
            .paginate(&self.db, size);

        let total = paginator
            .num_items()
            .await
            .map_err(|e| AcademyError::database_operation(format!("查询报名总数失败: {e}")))?;
        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| AcademyError::database_operation(format!("查询报名页数失败: {e}")))?;
        let rows = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| AcademyError::database_operation(format!("查询报名列表失败: {e}")))?;

        let occurrence_ids: Vec<i64> = rows.iter().map(|r| r.occurrence_id).collect();
        let occurrences: HashMap<i64, OccurrenceModel> = if occurrence_ids.is_empty() {
            HashMap::new()
        } else {
            ClassOccurrences::find()
                .filter(OccurrenceColumn::Id.is_in(occurrence_ids))
                .all(&self.db)
                .await
                .map_err(|e| AcademyError::database_operation(format!("查询场次失败: {e}")))?
                .into_iter()
                .map(|m| (m.id, m))
                .collect()
        };

        let items = rows
            .into_iter()
            .filter_map(|row| {
                let occurrence = occurrences.get(&row.occurrence_id)?.clone();
                Some(MyEnrollment {
                    enrollment: row.into_enrollment(),
                    occurrence: occurrence.into_occurrence(),
                })
            })
            .collect();

        Ok(MyEnrollmentListResponse {
            items,
            pagination: PaginationInfo::new(page, size, total, pages),
        })
    }
}
