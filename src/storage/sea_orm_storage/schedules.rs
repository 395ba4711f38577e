//! 每周排课存储操作

use super::SeaOrmStorage;
use crate::entity::schedule_slots::{ActiveModel, Column, Entity as ScheduleSlots};
use crate::errors::{AcademyError, Result};
use crate::models::{
    schedules::{entities::ScheduleSlot, requests::CreateScheduleSlotRequest},
    venues::entities::ActiveStatus,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};

impl SeaOrmStorage {
    /// 新增排课
    ///
    /// 重复检查与插入在同一事务中完成：同一课程下不能有两个启用中的排课
    /// 共享相同的星期和开始时间。
    pub async fn create_schedule_slot_impl(
        &self,
        class_id: i64,
        req: CreateScheduleSlotRequest,
    ) -> Result<ScheduleSlot> {
        let now = chrono::Utc::now().timestamp();

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AcademyError::database_operation(format!("开启事务失败: {e}")))?;

        let duplicates = ScheduleSlots::find()
            .filter(Column::ClassId.eq(class_id))
            .filter(Column::Weekday.eq(req.weekday))
            .filter(Column::StartTime.eq(req.start_time.as_str()))
            .filter(Column::Status.eq(ActiveStatus::Active.to_string()))
            .count(&txn)
            .await
            .map_err(|e| AcademyError::database_operation(format!("查询排课失败: {e}")))?;

        if duplicates > 0 {
            return Err(AcademyError::conflict(format!(
                "Class {class_id} already has an active slot on weekday {} at {}",
                req.weekday, req.start_time
            )));
        }

        let model = ActiveModel {
            class_id: Set(class_id),
            weekday: Set(req.weekday),
            start_time: Set(req.start_time),
            instructor_id: Set(req.instructor_id),
            venue_id: Set(req.venue_id),
            status: Set(ActiveStatus::Active.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let inserted = model
            .insert(&txn)
            .await
            .map_err(|e| AcademyError::database_operation(format!("创建排课失败: {e}")))?;

        txn.commit()
            .await
            .map_err(|e| AcademyError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(inserted.into_slot())
    }

    pub async fn get_schedule_slot_impl(
        &self,
        class_id: i64,
        slot_id: i64,
    ) -> Result<Option<ScheduleSlot>> {
        let result = ScheduleSlots::find_by_id(slot_id)
            .filter(Column::ClassId.eq(class_id))
            .one(&self.db)
            .await
            .map_err(|e| AcademyError::database_operation(format!("查询排课失败: {e}")))?;

        Ok(result.map(|m| m.into_slot()))
    }

    /// 列出课程的排课，按星期、开始时间排序
    pub async fn list_schedule_slots_impl(
        &self,
        class_id: i64,
        include_inactive: bool,
    ) -> Result<Vec<ScheduleSlot>> {
        let mut select = ScheduleSlots::find().filter(Column::ClassId.eq(class_id));
        if !include_inactive {
            select = select.filter(Column::Status.eq(ActiveStatus::Active.to_string()));
        }

        let slots = select
            .order_by_asc(Column::Weekday)
            .order_by_asc(Column::StartTime)
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| AcademyError::database_operation(format!("查询排课列表失败: {e}")))?;

        Ok(slots.into_iter().map(|m| m.into_slot()).collect())
    }

    /// 停用排课，已生成的场次不受影响
    pub async fn deactivate_schedule_slot_impl(&self, class_id: i64, slot_id: i64) -> Result<bool> {
        let result = ScheduleSlots::update_many()
            .set(ActiveModel {
                status: Set(ActiveStatus::Inactive.to_string()),
                updated_at: Set(chrono::Utc::now().timestamp()),
                ..Default::default()
            })
            .filter(Column::Id.eq(slot_id))
            .filter(Column::ClassId.eq(class_id))
            .filter(Column::Status.eq(ActiveStatus::Active.to_string()))
            .exec(&self.db)
            .await
            .map_err(|e| AcademyError::database_operation(format!("停用排课失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}
