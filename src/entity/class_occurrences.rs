//! 课程场次实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "class_occurrences")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub class_id: i64,
    pub slot_id: Option<i64>,
    pub instructor_id: i64,
    pub venue_id: i64,
    pub starts_at: i64,
    pub ends_at: i64,
    pub status: String,
    // 有效报名数，只通过比较并交换更新
    pub enrolled_count: i32,
    pub cancelled_at: Option<i64>,
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
    #[sea_orm(has_many = "super::class_enrollments::Entity")]
    Enrollments,
}

impl Related<super::class_definitions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Class.def()
    }
}

impl Related<super::class_enrollments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Enrollments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_occurrence(self) -> crate::models::occurrences::entities::Occurrence {
        use crate::models::occurrences::entities::{Occurrence, OccurrenceStatus};

        Occurrence {
            id: self.id,
            class_id: self.class_id,
            slot_id: self.slot_id,
            instructor_id: self.instructor_id,
            venue_id: self.venue_id,
            starts_at: super::ts(self.starts_at),
            ends_at: super::ts(self.ends_at),
            status: self
                .status
                .parse::<OccurrenceStatus>()
                .unwrap_or(OccurrenceStatus::Cancelled),
            enrolled_count: self.enrolled_count,
            cancelled_at: self.cancelled_at.map(super::ts),
            created_at: super::ts(self.created_at),
            updated_at: super::ts(self.updated_at),
        }
    }
}
