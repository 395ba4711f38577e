//! 场地实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "venues")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub name: String,
    pub sport: Option<String>,
    pub status: String,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::schedule_slots::Entity")]
    ScheduleSlots,
}

impl Related<super::schedule_slots::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ScheduleSlots.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_venue(self) -> crate::models::venues::entities::Venue {
        use crate::models::venues::entities::{ActiveStatus, Venue};

        Venue {
            id: self.id,
            name: self.name,
            sport: self.sport,
            status: self
                .status
                .parse::<ActiveStatus>()
                .unwrap_or(ActiveStatus::Active),
            created_at: super::ts(self.created_at),
            updated_at: super::ts(self.updated_at),
        }
    }
}
