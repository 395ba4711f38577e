use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::enrollments::requests::{
    BulkEnrollRequest, EnrollRequest, MyEnrollmentsParams, OccurrenceEnrollmentsParams,
};
use crate::models::users::entities::UserRole;
use crate::services::EnrollmentService;
use crate::utils::SafeIDI64;

static ENROLLMENT_SERVICE: Lazy<EnrollmentService> = Lazy::new(EnrollmentService::new_lazy);

// 请求体可省略，学员自助报名时为空
pub async fn enroll(
    req: HttpRequest,
    occurrence_id: SafeIDI64,
    body: Option<web::Json<EnrollRequest>>,
) -> ActixResult<HttpResponse> {
    let body = body.map(|json| json.into_inner()).unwrap_or_default();
    ENROLLMENT_SERVICE.enroll(&req, occurrence_id.0, body).await
}

pub async fn list_occurrence_enrollments(
    req: HttpRequest,
    occurrence_id: SafeIDI64,
    query: web::Query<OccurrenceEnrollmentsParams>,
) -> ActixResult<HttpResponse> {
    ENROLLMENT_SERVICE
        .list_for_occurrence(&req, occurrence_id.0, query.into_inner())
        .await
}

pub async fn bulk_enroll(
    req: HttpRequest,
    body: web::Json<BulkEnrollRequest>,
) -> ActixResult<HttpResponse> {
    ENROLLMENT_SERVICE.bulk_enroll(&req, body.into_inner()).await
}

pub async fn cancel_enrollment(
    req: HttpRequest,
    enrollment_id: SafeIDI64,
) -> ActixResult<HttpResponse> {
    ENROLLMENT_SERVICE.cancel(&req, enrollment_id.0).await
}

pub async fn list_my_enrollments(
    req: HttpRequest,
    query: web::Query<MyEnrollmentsParams>,
) -> ActixResult<HttpResponse> {
    ENROLLMENT_SERVICE.list_mine(&req, query.into_inner()).await
}

/// 场次下的报名资源，挂在 /class-occurrences/{id} 作用域内
pub fn configure_occurrence_enrollment_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/{id}/enrollments")
            .route(
                web::post()
                    .to(enroll)
                    .wrap(middlewares::RequireRole::any(UserRole::enrollment_roles()))
                    .wrap(middlewares::RateLimit::enrollment()),
            )
            .route(
                web::get()
                    .to(list_occurrence_enrollments)
                    .wrap(middlewares::RequireRole::any(UserRole::staff_roles())),
            ),
    );
}

// 配置路由
pub fn configure_enrollments_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/enrollments")
            .wrap(middlewares::RequireJWT)
            .route("/me", web::get().to(list_my_enrollments))
            .service(
                web::resource("/bulk").route(
                    web::post()
                        .to(bulk_enroll)
                        .wrap(middlewares::RequireRole::only(UserRole::Admin))
                        .wrap(middlewares::RateLimit::bulk()),
                ),
            )
            .service(
                web::resource("/{id}").route(
                    web::delete()
                        .to(cancel_enrollment)
                        .wrap(middlewares::RequireRole::any(UserRole::enrollment_roles()))
                        .wrap(middlewares::RateLimit::enrollment()),
                ),
            ),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, http::StatusCode, test};
    use chrono::{FixedOffset, NaiveDate, TimeZone, Utc};
    use std::sync::Arc;

    use crate::models::{
        classes::requests::CreateClassRequest, schedules::requests::CreateScheduleSlotRequest,
        users::requests::CreateUserRequest, venues::requests::CreateVenueRequest,
    };
    use crate::routes::configure_occurrences_routes;
    use crate::storage::{Storage, sea_orm_storage::SeaOrmStorage};
    use crate::utils::{Clock, FixedClock, jwt::JwtUtils};

    async fn create_user(storage: &Arc<dyn Storage>, username: &str, role: UserRole) -> i64 {
        storage
            .create_user(CreateUserRequest {
                username: username.to_string(),
                email: format!("{username}@academy.test"),
                password: "not-a-real-hash".to_string(),
                role,
                display_name: None,
                phone: None,
            })
            .await
            .unwrap()
            .id
    }

    fn bearer(user_id: i64, role: UserRole) -> (&'static str, String) {
        let token = JwtUtils::generate_access_token(user_id, &role.to_string()).unwrap();
        ("Authorization", format!("Bearer {token}"))
    }

    /// 容量为 1 的课程在 2040-01-02（周一）的场次
    async fn seed_occurrence(storage: &Arc<dyn Storage>, now: chrono::DateTime<Utc>) -> i64 {
        let instructor_id = create_user(storage, "coach", UserRole::Instructor).await;
        let venue_id = storage
            .create_venue(CreateVenueRequest {
                name: "Quadra 2".to_string(),
                sport: Some("futevolei".to_string()),
            })
            .await
            .unwrap()
            .id;
        let class_id = storage
            .create_class(CreateClassRequest {
                name: "Futevôlei Intermediário".to_string(),
                sport: "futevolei".to_string(),
                level: "intermediario".to_string(),
                duration_minutes: 90,
                capacity_max: 1,
                price_cents: None,
            })
            .await
            .unwrap()
            .id;
        storage
            .create_schedule_slot(
                class_id,
                CreateScheduleSlotRequest {
                    weekday: 1,
                    start_time: "07:00".to_string(),
                    instructor_id,
                    venue_id,
                },
            )
            .await
            .unwrap();

        let range_start = NaiveDate::from_ymd_opt(2040, 1, 1).unwrap();
        let range_end = NaiveDate::from_ymd_opt(2040, 1, 7).unwrap();
        storage
            .generate_occurrences(class_id, range_start, range_end, now)
            .await
            .unwrap()
            .occurrences[0]
            .id
    }

    #[actix_web::test]
    async fn test_enroll_conflicts_and_cancel() {
        let storage: Arc<dyn Storage> = Arc::new(
            SeaOrmStorage::connect("sqlite::memory:", 1, 5, FixedOffset::east_opt(0).unwrap())
                .await
                .unwrap(),
        );
        let now = Utc.with_ymd_and_hms(2030, 6, 1, 12, 0, 0).unwrap();
        let clock: Arc<dyn Clock> = Arc::new(FixedClock::new(now));

        let occurrence_id = seed_occurrence(&storage, now).await;
        let ana = create_user(&storage, "ana", UserRole::Student).await;
        let bruno = create_user(&storage, "bruno", UserRole::Student).await;

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(storage.clone()))
                .app_data(web::Data::new(clock))
                .configure(configure_occurrences_routes)
                .configure(configure_enrollments_routes),
        )
        .await;
        let enroll_uri = format!("/api/v1/class-occurrences/{occurrence_id}/enrollments");

        let req = test::TestRequest::post()
            .uri(&enroll_uri)
            .insert_header(bearer(ana, UserRole::Student))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["data"]["user_id"], ana);
        let enrollment_id = body["data"]["id"].as_i64().unwrap();

        let req = test::TestRequest::post()
            .uri(&enroll_uri)
            .insert_header(bearer(ana, UserRole::Student))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CONFLICT);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "ALREADY_ENROLLED");

        let req = test::TestRequest::post()
            .uri(&enroll_uri)
            .insert_header(bearer(bruno, UserRole::Student))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CONFLICT);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "CAPACITY_EXCEEDED");

        // 别人的报名不能取消
        let req = test::TestRequest::delete()
            .uri(&format!("/api/v1/enrollments/{enrollment_id}"))
            .insert_header(bearer(bruno, UserRole::Student))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        let req = test::TestRequest::delete()
            .uri(&format!("/api/v1/enrollments/{enrollment_id}"))
            .insert_header(bearer(ana, UserRole::Student))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);

        // 名额释放后另一名学员可以报名
        let req = test::TestRequest::post()
            .uri(&enroll_uri)
            .insert_header(bearer(bruno, UserRole::Student))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
    }
}
