//! 场地存储操作

use super::SeaOrmStorage;
use crate::entity::venues::{ActiveModel, Column, Entity as Venues};
use crate::errors::{AcademyError, Result};
use crate::models::{
    PaginationInfo,
    common::normalize_page,
    venues::{
        entities::{ActiveStatus, Venue},
        requests::{CreateVenueRequest, UpdateVenueRequest, VenueListParams},
        responses::VenueListResponse,
    },
};
use crate::utils::like_contains;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};

fn map_write_error(e: sea_orm::DbErr, action: &str) -> AcademyError {
    if super::is_unique_violation(&e) {
        AcademyError::conflict("Venue name already exists")
    } else {
        AcademyError::database_operation(format!("{action}失败: {e}"))
    }
}

impl SeaOrmStorage {
    pub async fn create_venue_impl(&self, req: CreateVenueRequest) -> Result<Venue> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            name: Set(req.name),
            sport: Set(req.sport),
            status: Set(ActiveStatus::Active.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| map_write_error(e, "创建场地"))?;

        Ok(result.into_venue())
    }

    pub async fn get_venue_by_id_impl(&self, id: i64) -> Result<Option<Venue>> {
        let result = Venues::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| AcademyError::database_operation(format!("查询场地失败: {e}")))?;

        Ok(result.map(|m| m.into_venue()))
    }

    pub async fn list_venues_with_pagination_impl(
        &self,
        query: VenueListParams,
    ) -> Result<VenueListResponse> {
        let (page, size) =
            normalize_page(Some(query.pagination.page), Some(query.pagination.size));

        let mut select = Venues::find();

        if let Some(status) = query.status {
            select = select.filter(Column::Status.eq(status.to_string()));
        }

        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let pattern = like_contains(search.trim());
            select = select.filter(Column::Name.like(pattern));
        }

        let paginator = select.order_by_asc(Column::Name).paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| AcademyError::database_operation(format!("查询场地总数失败: {e}")))?;
        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| AcademyError::database_operation(format!("查询场地页数失败: {e}")))?;
        let venues = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| AcademyError::database_operation(format!("查询场地列表失败: {e}")))?;

        Ok(VenueListResponse {
            items: venues.into_iter().map(|m| m.into_venue()).collect(),
            pagination: PaginationInfo::new(page, size, total, pages),
        })
    }

    pub async fn update_venue_impl(
        &self,
        id: i64,
        update: UpdateVenueRequest,
    ) -> Result<Option<Venue>> {
        if self.get_venue_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        if let Some(name) = update.name {
            model.name = Set(name);
        }
        if let Some(sport) = update.sport {
            model.sport = Set(Some(sport));
        }
        if let Some(status) = update.status {
            model.status = Set(status.to_string());
        }

        model
            .update(&self.db)
            .await
            .map_err(|e| map_write_error(e, "更新场地"))?;

        self.get_venue_by_id_impl(id).await
    }
}
