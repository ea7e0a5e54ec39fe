use std::sync::Arc;

use actix_web::{web, HttpResponse};
use chrono::Utc;

use crate::core::dates::colombia_date;
use crate::core::error::AppError;
use crate::middleware::auth::AuthenticatedUser;
use crate::modules::trips::models::{CreateTripRequest, TripListQuery, UpdateTripRequest};
use crate::modules::trips::services::TripService;

/// GET /api/trips
pub async fn list_trips(
    service: web::Data<Arc<TripService>>,
    user: AuthenticatedUser,
    query: web::Query<TripListQuery>,
) -> Result<HttpResponse, AppError> {
    let trips = service
        .list_trips(&user, query.into_inner(), colombia_date(Utc::now()))
        .await?;

    Ok(HttpResponse::Ok().json(trips))
}

/// POST /api/trips
pub async fn create_trip(
    service: web::Data<Arc<TripService>>,
    user: AuthenticatedUser,
    request: web::Json<CreateTripRequest>,
) -> Result<HttpResponse, AppError> {
    let trip = service.create_trip(&user, request.into_inner()).await?;
    Ok(HttpResponse::Created().json(trip))
}

/// GET /api/trips/{id}
pub async fn get_trip(
    service: web::Data<Arc<TripService>>,
    user: AuthenticatedUser,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let trip = service.get_trip(&user, &path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(trip))
}

/// PUT /api/trips/{id}
pub async fn update_trip(
    service: web::Data<Arc<TripService>>,
    user: AuthenticatedUser,
    path: web::Path<String>,
    request: web::Json<UpdateTripRequest>,
) -> Result<HttpResponse, AppError> {
    let trip = service
        .update_trip(&user, &path.into_inner(), request.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(trip))
}

/// DELETE /api/trips/{id}
pub async fn delete_trip(
    service: web::Data<Arc<TripService>>,
    user: AuthenticatedUser,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    service.delete_trip(&user, &path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Configure trip routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/trips")
            .route("", web::get().to(list_trips))
            .route("", web::post().to(create_trip))
            .route("/{id}", web::get().to(get_trip))
            .route("/{id}", web::put().to(update_trip))
            .route("/{id}", web::delete().to(delete_trip)),
    );
}
