use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::occurrences::requests::{
    GenerateOccurrencesRequest, OccurrenceListParams, UpdateOccurrenceRequest,
};
use crate::models::users::entities::UserRole;
use crate::services::OccurrenceService;
use crate::utils::SafeIDI64;

use super::enrollments::configure_occurrence_enrollment_routes;

static OCCURRENCE_SERVICE: Lazy<OccurrenceService> = Lazy::new(OccurrenceService::new_lazy);

pub async fn generate_occurrences(
    req: HttpRequest,
    body: web::Json<GenerateOccurrencesRequest>,
) -> ActixResult<HttpResponse> {
    OCCURRENCE_SERVICE.generate(&req, body.into_inner()).await
}

pub async fn list_occurrences(
    req: HttpRequest,
    query: web::Query<OccurrenceListParams>,
) -> ActixResult<HttpResponse> {
    OCCURRENCE_SERVICE.list(&req, query.into_inner()).await
}

pub async fn get_occurrence(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    OCCURRENCE_SERVICE.get(&req, id.0).await
}

pub async fn update_occurrence(
    req: HttpRequest,
    id: SafeIDI64,
    body: web::Json<UpdateOccurrenceRequest>,
) -> ActixResult<HttpResponse> {
    OCCURRENCE_SERVICE
        .update(&req, id.0, body.into_inner())
        .await
}

pub async fn confirm_occurrence(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    OCCURRENCE_SERVICE.confirm(&req, id.0).await
}

pub async fn cancel_occurrence(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    OCCURRENCE_SERVICE.cancel(&req, id.0).await
}

// 配置路由
pub fn configure_occurrences_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/class-occurrences")
            .wrap(middlewares::RequireJWT)
            .service(web::resource("").route(web::get().to(list_occurrences)))
            .service(
                web::resource("/generate").route(
                    web::post()
                        .to(generate_occurrences)
                        .wrap(middlewares::RequireRole::only(UserRole::Admin))
                        .wrap(middlewares::RateLimit::bulk()),
                ),
            )
            .service(
                web::resource("/{id}")
                    .route(web::get().to(get_occurrence))
                    .route(
                        web::put()
                            .to(update_occurrence)
                            .wrap(middlewares::RequireRole::only(UserRole::Admin)),
                    ),
            )
            .service(
                // 教练只能确认自己的场次，由服务层检查
                web::resource("/{id}/confirm").route(
                    web::patch()
                        .to(confirm_occurrence)
                        .wrap(middlewares::RequireRole::any(UserRole::staff_roles())),
                ),
            )
            .service(
                web::resource("/{id}/cancel").route(
                    web::patch()
                        .to(cancel_occurrence)
                        .wrap(middlewares::RequireRole::only(UserRole::Admin)),
                ),
            )
            .configure(configure_occurrence_enrollment_routes),
    );
}
