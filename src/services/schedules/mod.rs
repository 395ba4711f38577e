pub mod create;
pub mod delete;
pub mod list;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::models::schedules::requests::{CreateScheduleSlotRequest, ScheduleSlotListParams};

pub struct ScheduleService;

impl ScheduleService {
    pub fn new_lazy() -> Self {
        Self
    }

    pub async fn list_slots(
        &self,
        request: &HttpRequest,
        class_id: i64,
        params: ScheduleSlotListParams,
    ) -> ActixResult<HttpResponse> {
        list::list_slots(request, class_id, params).await
    }

    pub async fn create_slot(
        &self,
        request: &HttpRequest,
        class_id: i64,
        slot_data: CreateScheduleSlotRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_slot(request, class_id, slot_data).await
    }

    pub async fn delete_slot(
        &self,
        request: &HttpRequest,
        class_id: i64,
        slot_id: i64,
    ) -> ActixResult<HttpResponse> {
        delete::delete_slot(request, class_id, slot_id).await
    }
}
