use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 创建用户表
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Users::Username)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Users::Email)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                    .col(ColumnDef::new(Users::Role).string().not_null())
                    .col(ColumnDef::new(Users::Status).string().not_null())
                    .col(ColumnDef::new(Users::DisplayName).string().null())
                    .col(ColumnDef::new(Users::Phone).string().null())
                    .col(ColumnDef::new(Users::LastLogin).big_integer().null())
                    .col(ColumnDef::new(Users::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Users::UpdatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        // 创建场地表
        manager
            .create_table(
                Table::create()
                    .table(Venues::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Venues::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Venues::Name)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Venues::Sport).string().null())
                    .col(ColumnDef::new(Venues::Status).string().not_null())
                    .col(ColumnDef::new(Venues::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Venues::UpdatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        // 创建课程定义表
        manager
            .create_table(
                Table::create()
                    .table(ClassDefinitions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ClassDefinitions::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ClassDefinitions::Name).string().not_null())
                    .col(ColumnDef::new(ClassDefinitions::Sport).string().not_null())
                    .col(ColumnDef::new(ClassDefinitions::Level).string().not_null())
                    .col(
                        ColumnDef::new(ClassDefinitions::DurationMinutes)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ClassDefinitions::CapacityMax)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ClassDefinitions::PriceCents)
                            .big_integer()
                            .null(),
                    )
                    .col(ColumnDef::new(ClassDefinitions::Status).string().not_null())
                    .col(
                        ColumnDef::new(ClassDefinitions::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ClassDefinitions::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建每周排课表
        manager
            .create_table(
                Table::create()
                    .table(ScheduleSlots::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ScheduleSlots::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ScheduleSlots::ClassId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ScheduleSlots::Weekday).integer().not_null())
                    .col(ColumnDef::new(ScheduleSlots::StartTime).string().not_null())
                    .col(
                        ColumnDef::new(ScheduleSlots::InstructorId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ScheduleSlots::VenueId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ScheduleSlots::Status).string().not_null())
                    .col(
                        ColumnDef::new(ScheduleSlots::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ScheduleSlots::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(ScheduleSlots::Table, ScheduleSlots::ClassId)
                            .to(ClassDefinitions::Table, ClassDefinitions::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(ScheduleSlots::Table, ScheduleSlots::InstructorId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(ScheduleSlots::Table, ScheduleSlots::VenueId)
                            .to(Venues::Table, Venues::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建课程场次表
        manager
            .create_table(
                Table::create()
                    .table(ClassOccurrences::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ClassOccurrences::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ClassOccurrences::ClassId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ClassOccurrences::SlotId).big_integer().null())
                    .col(
                        ColumnDef::new(ClassOccurrences::InstructorId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ClassOccurrences::VenueId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ClassOccurrences::StartsAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ClassOccurrences::EndsAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ClassOccurrences::Status).string().not_null())
                    .col(
                        ColumnDef::new(ClassOccurrences::EnrolledCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(ClassOccurrences::CancelledAt)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(ClassOccurrences::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ClassOccurrences::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(ClassOccurrences::Table, ClassOccurrences::ClassId)
                            .to(ClassDefinitions::Table, ClassDefinitions::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(ClassOccurrences::Table, ClassOccurrences::SlotId)
                            .to(ScheduleSlots::Table, ScheduleSlots::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(ClassOccurrences::Table, ClassOccurrences::InstructorId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(ClassOccurrences::Table, ClassOccurrences::VenueId)
                            .to(Venues::Table, Venues::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建报名表
        manager
            .create_table(
                Table::create()
                    .table(ClassEnrollments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ClassEnrollments::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ClassEnrollments::OccurrenceId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ClassEnrollments::UserId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ClassEnrollments::Status).string().not_null())
                    .col(
                        ColumnDef::new(ClassEnrollments::ActiveUserId)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(ClassEnrollments::EnrolledBy)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ClassEnrollments::EnrolledAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ClassEnrollments::CancelledBy)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(ClassEnrollments::CancelledAt)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(ClassEnrollments::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(ClassEnrollments::Table, ClassEnrollments::OccurrenceId)
                            .to(ClassOccurrences::Table, ClassOccurrences::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(ClassEnrollments::Table, ClassEnrollments::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 用户表索引
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_users_role")
                    .table(Users::Table)
                    .col(Users::Role)
                    .to_owned(),
            )
            .await?;

        // 排课表索引
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_schedule_slots_class_weekday")
                    .table(ScheduleSlots::Table)
                    .col(ScheduleSlots::ClassId)
                    .col(ScheduleSlots::Weekday)
                    .to_owned(),
            )
            .await?;

        // 同一课程同一开始时间只能有一个场次
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_class_occurrences_class_starts_at")
                    .table(ClassOccurrences::Table)
                    .col(ClassOccurrences::ClassId)
                    .col(ClassOccurrences::StartsAt)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_class_occurrences_starts_at")
                    .table(ClassOccurrences::Table)
                    .col(ClassOccurrences::StartsAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_class_occurrences_instructor_id")
                    .table(ClassOccurrences::Table)
                    .col(ClassOccurrences::InstructorId)
                    .to_owned(),
            )
            .await?;

        // active_user_id 取消后置 NULL，NULL 之间互不冲突
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_class_enrollments_active")
                    .table(ClassEnrollments::Table)
                    .col(ClassEnrollments::OccurrenceId)
                    .col(ClassEnrollments::ActiveUserId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_class_enrollments_user_id")
                    .table(ClassEnrollments::Table)
                    .col(ClassEnrollments::UserId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 按照创建的相反顺序删除
        manager
            .drop_table(Table::drop().table(ClassEnrollments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ClassOccurrences::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ScheduleSlots::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ClassDefinitions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Venues::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Users {
    #[sea_orm(iden = "users")]
    Table,
    Id,
    Username,
    Email,
    PasswordHash,
    Role,
    Status,
    DisplayName,
    Phone,
    LastLogin,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Venues {
    #[sea_orm(iden = "venues")]
    Table,
    Id,
    Name,
    Sport,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum ClassDefinitions {
    #[sea_orm(iden = "class_definitions")]
    Table,
    Id,
    Name,
    Sport,
    Level,
    DurationMinutes,
    CapacityMax,
    PriceCents,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum ScheduleSlots {
    #[sea_orm(iden = "schedule_slots")]
    Table,
    Id,
    ClassId,
    Weekday,
    StartTime,
    InstructorId,
    VenueId,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum ClassOccurrences {
    #[sea_orm(iden = "class_occurrences")]
    Table,
    Id,
    ClassId,
    SlotId,
    InstructorId,
    VenueId,
    StartsAt,
    EndsAt,
    Status,
    EnrolledCount,
    CancelledAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum ClassEnrollments {
    #[sea_orm(iden = "class_enrollments")]
    Table,
    Id,
    OccurrenceId,
    UserId,
    Status,
    ActiveUserId,
    EnrolledBy,
    EnrolledAt,
    CancelledBy,
    CancelledAt,
    UpdatedAt,
}
