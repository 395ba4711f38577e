//! 每周排课实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "schedule_slots")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub class_id: i64,
    pub weekday: i32,
    pub start_time: String,
    pub instructor_id: i64,
    pub venue_id: i64,
    pub status: String,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::class_definitions::Entity",
        from = "Column::ClassId",
        to = "super::class_definitions::Column::Id"
    )]
    Class,
    #[sea_orm(
        belongs_to = "super::venues::Entity",
        from = "Column::VenueId",
        to = "super::venues::Column::Id"
    )]
    Venue,
}

impl Related<super::class_definitions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Class.def()
    }
}

impl Related<super::venues::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Venue.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_slot(self) -> crate::models::schedules::entities::ScheduleSlot {
        use crate::models::schedules::entities::ScheduleSlot;
        use crate::models::venues::entities::ActiveStatus;

        ScheduleSlot {
            id: self.id,
            class_id: self.class_id,
            weekday: self.weekday,
            start_time: self.start_time,
            instructor_id: self.instructor_id,
            venue_id: self.venue_id,
            status: self
                .status
                .parse::<ActiveStatus>()
                .unwrap_or(ActiveStatus::Inactive),
            created_at: super::ts(self.created_at),
            updated_at: super::ts(self.updated_at),
        }
    }
}
