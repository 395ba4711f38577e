//! 课程定义存储操作

use super::SeaOrmStorage;
use crate::entity::class_definitions::{ActiveModel, Column, Entity as ClassDefinitions};
use crate::errors::{AcademyError, Result};
use crate::models::{
    PaginationInfo,
    classes::{
        entities::ClassDefinition,
        requests::{ClassListQuery, CreateClassRequest, UpdateClassRequest},
        responses::ClassListResponse,
    },
    common::normalize_page,
    venues::entities::ActiveStatus,
};
use crate::utils::like_contains;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};

impl SeaOrmStorage {
    /// 创建课程
    pub async fn create_class_impl(&self, req: CreateClassRequest) -> Result<ClassDefinition> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            name: Set(req.name),
            sport: Set(req.sport),
            level: Set(req.level),
            duration_minutes: Set(req.duration_minutes),
            capacity_max: Set(req.capacity_max),
            price_cents: Set(req.price_cents),
            status: Set(ActiveStatus::Active.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| AcademyError::database_operation(format!("创建课程失败: {e}")))?;

        Ok(result.into_class())
    }

    /// 通过 ID 获取课程
    pub async fn get_class_by_id_impl(&self, class_id: i64) -> Result<Option<ClassDefinition>> {
        let result = ClassDefinitions::find_by_id(class_id)
            .one(&self.db)
            .await
            .map_err(|e| AcademyError::database_operation(format!("查询课程失败: {e}")))?;

        Ok(result.map(|m| m.into_class()))
    }

    /// 分页列出课程
    pub async fn list_classes_with_pagination_impl(
        &self,
        query: ClassListQuery,
    ) -> Result<ClassListResponse> {
        let (page, size) = normalize_page(query.page, query.size);

        let mut select = ClassDefinitions::find();

        if let Some(ref sport) = query.sport {
            select = select.filter(Column::Sport.eq(sport.as_str()));
        }

        if let Some(status) = query.status {
            select = select.filter(Column::Status.eq(status.to_string()));
        }

        // 搜索条件
        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let pattern = like_contains(search.trim());
            select = select.filter(Column::Name.like(pattern));
        }

        select = select.order_by_asc(Column::Name).order_by_asc(Column::Id);

        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| AcademyError::database_operation(format!("查询课程总数失败: {e}")))?;

        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| AcademyError::database_operation(format!("查询课程页数失败: {e}")))?;

        let classes = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| AcademyError::database_operation(format!("查询课程列表失败: {e}")))?;

        Ok(ClassListResponse {
            items: classes.into_iter().map(|m| m.into_class()).collect(),
            pagination: PaginationInfo::new(page, size, total, pages),
        })
    }

    /// 更新课程信息
    pub async fn update_class_impl(
        &self,
        class_id: i64,
        update: UpdateClassRequest,
    ) -> Result<Option<ClassDefinition>> {
        if self.get_class_by_id_impl(class_id).await?.is_none() {
            return Ok(None);
        }

        let now = chrono::Utc::now().timestamp();

        let mut model = ActiveModel {
            id: Set(class_id),
            updated_at: Set(now),
            ..Default::default()
        };

        if let Some(name) = update.name {
            model.name = Set(name);
        }
        if let Some(sport) = update.sport {
            model.sport = Set(sport);
        }
        if let Some(level) = update.level {
            model.level = Set(level);
        }
        if let Some(duration) = update.duration_minutes {
            model.duration_minutes = Set(duration);
        }
        if let Some(capacity) = update.capacity_max {
            model.capacity_max = Set(capacity);
        }
        if let Some(price) = update.price_cents {
            model.price_cents = Set(Some(price));
        }
        if let Some(status) = update.status {
            model.status = Set(status.to_string());
        }

        model
            .update(&self.db)
            .await
            .map_err(|e| AcademyError::database_operation(format!("更新课程失败: {e}")))?;

        self.get_class_by_id_impl(class_id).await
    }

    /// 停用课程，已生成的场次保持不变
    pub async fn deactivate_class_impl(&self, class_id: i64) -> Result<bool> {
        let now = chrono::Utc::now().timestamp();

        let result = ClassDefinitions::update_many()
            .set(ActiveModel {
                status: Set(ActiveStatus::Inactive.to_string()),
                updated_at: Set(now),
                ..Default::default()
            })
            .filter(Column::Id.eq(class_id))
            .exec(&self.db)
            .await
            .map_err(|e| AcademyError::database_operation(format!("停用课程失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}
