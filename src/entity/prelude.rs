//! 预导入模块，方便使用

pub use super::class_definitions::{
    ActiveModel as ClassDefinitionActiveModel, Entity as ClassDefinitions,
    Model as ClassDefinitionModel,
};
pub use super::class_enrollments::{
    ActiveModel as ClassEnrollmentActiveModel, Entity as ClassEnrollments,
    Model as ClassEnrollmentModel,
};
pub use super::class_occurrences::{
    ActiveModel as ClassOccurrenceActiveModel, Entity as ClassOccurrences,
    Model as ClassOccurrenceModel,
};
pub use super::schedule_slots::{
    ActiveModel as ScheduleSlotActiveModel, Entity as ScheduleSlots, Model as ScheduleSlotModel,
};
pub use super::users::{ActiveModel as UserActiveModel, Entity as Users, Model as UserModel};
pub use super::venues::{ActiveModel as VenueActiveModel, Entity as Venues, Model as VenueModel};
