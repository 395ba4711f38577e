use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::classes::requests::{ClassQueryParams, CreateClassRequest, UpdateClassRequest};
use crate::models::schedules::requests::{CreateScheduleSlotRequest, ScheduleSlotListParams};
use crate::models::users::entities::UserRole;
use crate::services::{ClassService, ScheduleService};
use crate::utils::{SafeClassIdI64, SafeIDI64, SafeSlotIdI64};

// 懒加载的全局服务实例
static CLASS_SERVICE: Lazy<ClassService> = Lazy::new(ClassService::new_lazy);
static SCHEDULE_SERVICE: Lazy<ScheduleService> = Lazy::new(ScheduleService::new_lazy);

pub async fn list_classes(
    req: HttpRequest,
    query: web::Query<ClassQueryParams>,
) -> ActixResult<HttpResponse> {
    CLASS_SERVICE.list_classes(&req, query.into_inner()).await
}

pub async fn create_class(
    req: HttpRequest,
    class_data: web::Json<CreateClassRequest>,
) -> ActixResult<HttpResponse> {
    CLASS_SERVICE
        .create_class(&req, class_data.into_inner())
        .await
}

pub async fn get_class(req: HttpRequest, class_id: SafeIDI64) -> ActixResult<HttpResponse> {
    CLASS_SERVICE.get_class(&req, class_id.0).await
}

pub async fn update_class(
    req: HttpRequest,
    class_id: SafeIDI64,
    update_data: web::Json<UpdateClassRequest>,
) -> ActixResult<HttpResponse> {
    CLASS_SERVICE
        .update_class(&req, class_id.0, update_data.into_inner())
        .await
}

pub async fn delete_class(req: HttpRequest, class_id: SafeIDI64) -> ActixResult<HttpResponse> {
    CLASS_SERVICE.delete_class(&req, class_id.0).await
}

pub async fn list_schedule_slots(
    req: HttpRequest,
    class_id: SafeClassIdI64,
    query: web::Query<ScheduleSlotListParams>,
) -> ActixResult<HttpResponse> {
    SCHEDULE_SERVICE
        .list_slots(&req, class_id.0, query.into_inner())
        .await
}

pub async fn create_schedule_slot(
    req: HttpRequest,
    class_id: SafeClassIdI64,
    slot_data: web::Json<CreateScheduleSlotRequest>,
) -> ActixResult<HttpResponse> {
    SCHEDULE_SERVICE
        .create_slot(&req, class_id.0, slot_data.into_inner())
        .await
}

pub async fn delete_schedule_slot(
    req: HttpRequest,
    class_id: SafeClassIdI64,
    slot_id: SafeSlotIdI64,
) -> ActixResult<HttpResponse> {
    SCHEDULE_SERVICE
        .delete_slot(&req, class_id.0, slot_id.0)
        .await
}

// 配置路由
pub fn configure_classes_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/classes")
            .wrap(middlewares::RequireJWT)
            .service(
                // 所有登录用户可浏览课程，管理员维护课程
                web::resource("").route(web::get().to(list_classes)).route(
                    web::post()
                        .to(create_class)
                        .wrap(middlewares::RequireRole::only(UserRole::Admin)),
                ),
            )
            .service(
                web::resource("/{id}")
                    .route(web::get().to(get_class))
                    .route(
                        web::put()
                            .to(update_class)
                            .wrap(middlewares::RequireRole::only(UserRole::Admin)),
                    )
                    .route(
                        web::delete()
                            .to(delete_class)
                            .wrap(middlewares::RequireRole::only(UserRole::Admin)),
                    ),
            )
            .service(
                web::resource("/{class_id}/schedules")
                    .route(web::get().to(list_schedule_slots))
                    .route(
                        web::post()
                            .to(create_schedule_slot)
                            .wrap(middlewares::RequireRole::only(UserRole::Admin)),
                    ),
            )
            .service(
                web::resource("/{class_id}/schedules/{slot_id}").route(
                    web::delete()
                        .to(delete_schedule_slot)
                        .wrap(middlewares::RequireRole::only(UserRole::Admin)),
                ),
            ),
    );
}
