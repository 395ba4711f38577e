//! 报名记录实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "class_enrollments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub occurrence_id: i64,
    pub user_id: i64,
    pub status: String,
    // 有效时等于 user_id，取消后置空；与 occurrence_id 组成唯一索引
    pub active_user_id: Option<i64>,
    pub enrolled_by: i64,
    pub enrolled_at: i64,
    pub cancelled_by: Option<i64>,
    pub cancelled_at: Option<i64>,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::class_occurrences::Entity",
        from = "Column::OccurrenceId",
        to = "super::class_occurrences::Column::Id"
    )]
    Occurrence,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id"
    )]
    User,
}

impl Related<super::class_occurrences::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Occurrence.def()
    }
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_enrollment(self) -> crate::models::enrollments::entities::Enrollment {
        use crate::models::enrollments::entities::{Enrollment, EnrollmentStatus};

        Enrollment {
            id: self.id,
            occurrence_id: self.occurrence_id,
            user_id: self.user_id,
            status: self
                .status
                .parse::<EnrollmentStatus>()
                .unwrap_or(EnrollmentStatus::Cancelled),
            enrolled_by: self.enrolled_by,
            enrolled_at: super::ts(self.enrolled_at),
            cancelled_by: self.cancelled_by,
            cancelled_at: self.cancelled_at.map(super::ts),
            updated_at: super::ts(self.updated_at),
        }
    }
}
