use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::users::entities::UserRole;
use crate::models::venues::requests::{CreateVenueRequest, UpdateVenueRequest, VenueListParams};
use crate::services::VenueService;
use crate::utils::SafeIDI64;

static VENUE_SERVICE: Lazy<VenueService> = Lazy::new(VenueService::new_lazy);

pub async fn list_venues(
    req: HttpRequest,
    query: web::Query<VenueListParams>,
) -> ActixResult<HttpResponse> {
    VENUE_SERVICE.list_venues(query.into_inner(), &req).await
}

pub async fn create_venue(
    req: HttpRequest,
    venue_data: web::Json<CreateVenueRequest>,
) -> ActixResult<HttpResponse> {
    VENUE_SERVICE
        .create_venue(venue_data.into_inner(), &req)
        .await
}

pub async fn update_venue(
    req: HttpRequest,
    venue_id: SafeIDI64,
    update_data: web::Json<UpdateVenueRequest>,
) -> ActixResult<HttpResponse> {
    VENUE_SERVICE
        .update_venue(venue_id.0, update_data.into_inner(), &req)
        .await
}

pub fn configure_venues_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/venues")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("").route(web::get().to(list_venues)).route(
                    web::post()
                        .to(create_venue)
                        .wrap(middlewares::RequireRole::only(UserRole::Admin)),
                ),
            )
            .service(
                web::resource("/{id}").route(
                    web::put()
                        .to(update_venue)
                        .wrap(middlewares::RequireRole::only(UserRole::Admin)),
                ),
            ),
    );
}
