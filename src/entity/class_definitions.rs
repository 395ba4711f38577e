//! 课程定义实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "class_definitions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    pub sport: String,
    pub level: String,
    pub duration_minutes: i32,
    pub capacity_max: i32,
    pub price_cents: Option<i64>,
    pub status: String,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::schedule_slots::Entity")]
    ScheduleSlots,
    #[sea_orm(has_many = "super::class_occurrences::Entity")]
    Occurrences,
}

impl Related<super::schedule_slots::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ScheduleSlots.def()
    }
}

impl Related<super::class_occurrences::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Occurrences.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_class(self) -> crate::models::classes::entities::ClassDefinition {
        use crate::models::classes::entities::ClassDefinition;
        use crate::models::venues::entities::ActiveStatus;

        ClassDefinition {
            id: self.id,
            name: self.name,
            sport: self.sport,
            level: self.level,
            duration_minutes: self.duration_minutes,
            capacity_max: self.capacity_max,
            price_cents: self.price_cents,
            status: self
                .status
                .parse::<ActiveStatus>()
                .unwrap_or(ActiveStatus::Inactive),
            created_at: super::ts(self.created_at),
            updated_at: super::ts(self.updated_at),
        }
    }
}
