//! 场次存储操作：展开生成、查询、确认与级联取消

use std::collections::HashSet;

use super::SeaOrmStorage;
use crate::entity::class_enrollments::{
    ActiveModel as EnrollmentActiveModel, Column as EnrollmentColumn, Entity as ClassEnrollments,
};
use crate::entity::class_occurrences::{ActiveModel, Column, Entity as ClassOccurrences};
use crate::errors::{AcademyError, Result};
use crate::models::{
    PaginationInfo,
    common::normalize_page,
    enrollments::entities::EnrollmentStatus,
    occurrences::{
        entities::{Occurrence, OccurrenceStatus},
        expander::{SlotTemplate, expand},
        requests::{OccurrenceListQuery, UpdateOccurrenceRequest},
        responses::{GenerateOccurrencesResponse, OccurrenceListResponse},
    },
};
use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use tracing::{info, warn};

fn status_strings(statuses: &[OccurrenceStatus]) -> Vec<String> {
    statuses.iter().map(|s| s.to_string()).collect()
}

impl SeaOrmStorage {
    /// 展开排课生成场次
    ///
    /// 已存在相同 (class_id, starts_at) 的场次会被跳过。所有插入在同一事务中，
    /// 任一失败则整批回滚。
    pub async fn generate_occurrences_impl(
        &self,
        class_id: i64,
        range_start: NaiveDate,
        range_end: NaiveDate,
        now: DateTime<Utc>,
    ) -> Result<GenerateOccurrencesResponse> {
        let class = self
            .get_class_by_id_impl(class_id)
            .await?
            .ok_or_else(|| AcademyError::not_found(format!("Class {class_id} not found")))?;

        if !class.is_schedulable() {
            return Err(AcademyError::invalid_state(format!(
                "Class {class_id} is inactive and cannot be scheduled"
            )));
        }

        let templates: Vec<SlotTemplate> = self
            .list_schedule_slots_impl(class_id, false)
            .await?
            .into_iter()
            .filter_map(|slot| {
                let Some(start_time) = slot.start_time_parsed() else {
                    warn!(
                        "Skipping slot {} with malformed start time '{}'",
                        slot.id, slot.start_time
                    );
                    return None;
                };
                Some(SlotTemplate {
                    slot_id: slot.id,
                    weekday: slot.weekday as u32,
                    start_time,
                    instructor_id: slot.instructor_id,
                    venue_id: slot.venue_id,
                })
            })
            .collect();

        let planned = expand(
            &templates,
            i64::from(class.duration_minutes),
            range_start,
            range_end,
            self.utc_offset,
        );

        let (Some(first), Some(last)) = (planned.first(), planned.last()) else {
            return Ok(GenerateOccurrencesResponse {
                created: 0,
                skipped: 0,
                occurrences: Vec::new(),
            });
        };
        let window = (first.starts_at.timestamp(), last.starts_at.timestamp());

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AcademyError::database_operation(format!("开启事务失败: {e}")))?;

        let mut seen: HashSet<i64> = ClassOccurrences::find()
            .filter(Column::ClassId.eq(class_id))
            .filter(Column::StartsAt.between(window.0, window.1))
            .all(&txn)
            .await
            .map_err(|e| AcademyError::database_operation(format!("查询已有场次失败: {e}")))?
            .into_iter()
            .map(|m| m.starts_at)
            .collect();

        let now = now.timestamp();
        let mut created = Vec::new();
        let mut skipped = 0usize;

        for plan in planned {
            let starts_at = plan.starts_at.timestamp();
            if !seen.insert(starts_at) {
                skipped += 1;
                continue;
            }

            let model = ActiveModel {
                class_id: Set(class_id),
                slot_id: Set(Some(plan.slot_id)),
                instructor_id: Set(plan.instructor_id),
                venue_id: Set(plan.venue_id),
                starts_at: Set(starts_at),
                ends_at: Set(plan.ends_at.timestamp()),
                status: Set(OccurrenceStatus::Scheduled.to_string()),
                enrolled_count: Set(0),
                cancelled_at: Set(None),
                created_at: Set(now),
                updated_at: Set(now),
                ..Default::default()
            };

            // 并发生成撞上唯一索引时整批回滚，重试即可跳过已存在的场次
            let inserted = model
                .insert(&txn)
                .await
                .map_err(|e| AcademyError::database_operation(format!("创建场次失败: {e}")))?;
            created.push(inserted.into_occurrence());
        }

        txn.commit()
            .await
            .map_err(|e| AcademyError::database_operation(format!("提交事务失败: {e}")))?;

        info!(
            "Generated occurrences for class {}: {} created, {} skipped ({} .. {})",
            class_id,
            created.len(),
            skipped,
            range_start,
            range_end
        );

        Ok(GenerateOccurrencesResponse {
            created: created.len(),
            skipped,
            occurrences: created,
        })
    }

    pub async fn get_occurrence_by_id_impl(&self, id: i64) -> Result<Option<Occurrence>> {
        let result = ClassOccurrences::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| AcademyError::database_operation(format!("查询场次失败: {e}")))?;

        Ok(result.map(|m| m.into_occurrence()))
    }

    async fn require_occurrence(&self, id: i64) -> Result<Occurrence> {
        self.get_occurrence_by_id_impl(id)
            .await?
            .ok_or_else(|| AcademyError::not_found(format!("Occurrence {id} not found")))
    }

    /// 分页列出场次，按开始时间升序
    pub async fn list_occurrences_with_pagination_impl(
        &self,
        query: OccurrenceListQuery,
    ) -> Result<OccurrenceListResponse> {
        let (page, size) = normalize_page(query.page, query.size);

        let mut select = ClassOccurrences::find();

        if let Some(class_id) = query.class_id {
            select = select.filter(Column::ClassId.eq(class_id));
        }
        if let Some(instructor_id) = query.instructor_id {
            select = select.filter(Column::InstructorId.eq(instructor_id));
        }
        if let Some(venue_id) = query.venue_id {
            select = select.filter(Column::VenueId.eq(venue_id));
        }
        if let Some(status) = query.status {
            select = select.filter(Column::Status.eq(status.to_string()));
        }
        if let Some(from) = query.starts_from {
            select = select.filter(Column::StartsAt.gte(from));
        }
        if let Some(before) = query.starts_before {
            select = select.filter(Column::StartsAt.lt(before));
        }

        let paginator = select
            .order_by_asc(Column::StartsAt)
            .order_by_asc(Column::Id)
            .paginate(&self.db, size);

        let total = paginator
            .num_items()
            .await
            .map_err(|e| AcademyError::database_operation(format!("查询场次总数失败: {e}")))?;
        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| AcademyError::database_operation(format!("查询场次页数失败: {e}")))?;
        let items = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| AcademyError::database_operation(format!("查询场次列表失败: {e}")))?;

        Ok(OccurrenceListResponse {
            items: items.into_iter().map(|m| m.into_occurrence()).collect(),
            pagination: PaginationInfo::new(page, size, total, pages),
        })
    }

    /// 调整场次的教练或场地，已取消的场次不可修改
    pub async fn update_occurrence_impl(
        &self,
        id: i64,
        update: UpdateOccurrenceRequest,
    ) -> Result<Occurrence> {
        let occurrence = self.require_occurrence(id).await?;
        if occurrence.status.is_cancelled() {
            return Err(AcademyError::invalid_state(format!(
                "Occurrence {id} is cancelled and cannot be edited"
            )));
        }

        let mut model = ActiveModel {
            updated_at: Set(Utc::now().timestamp()),
            ..Default::default()
        };
        if let Some(instructor_id) = update.instructor_id {
            model.instructor_id = Set(instructor_id);
        }
        if let Some(venue_id) = update.venue_id {
            model.venue_id = Set(venue_id);
        }

        let result = ClassOccurrences::update_many()
            .set(model)
            .filter(Column::Id.eq(id))
            .filter(Column::Status.ne(OccurrenceStatus::Cancelled.to_string()))
            .exec(&self.db)
            .await
            .map_err(|e| AcademyError::database_operation(format!("更新场次失败: {e}")))?;

        if result.rows_affected == 0 {
            return Err(AcademyError::invalid_state(format!(
                "Occurrence {id} was cancelled concurrently"
            )));
        }

        self.require_occurrence(id).await
    }

    /// scheduled -> confirmed
    pub async fn confirm_occurrence_impl(&self, id: i64) -> Result<Occurrence> {
        let occurrence = self.require_occurrence(id).await?;
        let next = occurrence.status.confirm()?;

        let result = ClassOccurrences::update_many()
            .set(ActiveModel {
                status: Set(next.to_string()),
                updated_at: Set(Utc::now().timestamp()),
                ..Default::default()
            })
            .filter(Column::Id.eq(id))
            .filter(Column::Status.is_in(status_strings(&OccurrenceStatus::predecessors_of(next))))
            .exec(&self.db)
            .await
            .map_err(|e| AcademyError::database_operation(format!("确认场次失败: {e}")))?;

        if result.rows_affected == 0 {
            return Err(AcademyError::invalid_state(format!(
                "Occurrence {id} changed status concurrently"
            )));
        }

        self.require_occurrence(id).await
    }

    /// 取消场次
    ///
    /// 场次状态、计数器清零和所有有效报名的取消在同一事务中完成。
    pub async fn cancel_occurrence_impl(
        &self,
        id: i64,
        actor_id: i64,
        now: DateTime<Utc>,
    ) -> Result<Occurrence> {
        let occurrence = self.require_occurrence(id).await?;
        let next = occurrence.status.cancel()?;
        if occurrence.has_started(now) {
            return Err(AcademyError::past_occurrence(format!(
                "Occurrence {id} has already started and cannot be cancelled"
            )));
        }

        let ts = now.timestamp();
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AcademyError::database_operation(format!("开启事务失败: {e}")))?;

        let result = ClassOccurrences::update_many()
            .set(ActiveModel {
                status: Set(next.to_string()),
                enrolled_count: Set(0),
                cancelled_at: Set(Some(ts)),
                updated_at: Set(ts),
                ..Default::default()
            })
            .filter(Column::Id.eq(id))
            .filter(Column::Status.is_in(status_strings(&OccurrenceStatus::predecessors_of(next))))
            .exec(&txn)
            .await
            .map_err(|e| AcademyError::database_operation(format!("取消场次失败: {e}")))?;

        if result.rows_affected == 0 {
            return Err(AcademyError::invalid_state(format!(
                "Occurrence {id} is already cancelled"
            )));
        }

        let cascaded = ClassEnrollments::update_many()
            .set(EnrollmentActiveModel {
                status: Set(EnrollmentStatus::Cancelled.to_string()),
                active_user_id: Set(None),
                cancelled_by: Set(Some(actor_id)),
                cancelled_at: Set(Some(ts)),
                updated_at: Set(ts),
                ..Default::default()
            })
            .filter(EnrollmentColumn::OccurrenceId.eq(id))
            .filter(EnrollmentColumn::Status.eq(EnrollmentStatus::Enrolled.to_string()))
            .exec(&txn)
            .await
            .map_err(|e| AcademyError::database_operation(format!("级联取消报名失败: {e}")))?;

        txn.commit()
            .await
            .map_err(|e| AcademyError::database_operation(format!("提交事务失败: {e}")))?;

        info!(
            "Occurrence {} cancelled by user {}, {} enrollment(s) cancelled",
            id, actor_id, cascaded.rows_affected
        );

        self.require_occurrence(id).await
    }
}
