use std::sync::Arc;

use actix_web::{web, HttpResponse};
use chrono::Utc;

use crate::core::dates::colombia_date;
use crate::core::error::AppError;
use crate::middleware::auth::AuthenticatedUser;
use crate::modules::vehicles::models::{
    CreateVehicleRequest, UpdateVehicleRequest, VehicleListQuery,
};
use crate::modules::vehicles::services::VehicleService;

/// GET /api/vehicles
pub async fn list_vehicles(
    service: web::Data<Arc<VehicleService>>,
    user: AuthenticatedUser,
    query: web::Query<VehicleListQuery>,
) -> Result<HttpResponse, AppError> {
    let vehicles = service.list_vehicles(&user, query.status).await?;
    Ok(HttpResponse::Ok().json(vehicles))
}

/// POST /api/vehicles
pub async fn create_vehicle(
    service: web::Data<Arc<VehicleService>>,
    user: AuthenticatedUser,
    request: web::Json<CreateVehicleRequest>,
) -> Result<HttpResponse, AppError> {
    let vehicle = service
        .create_vehicle(&user, request.into_inner(), colombia_date(Utc::now()))
        .await?;

    Ok(HttpResponse::Created().json(vehicle))
}

/// GET /api/vehicles/{id}
pub async fn get_vehicle(
    service: web::Data<Arc<VehicleService>>,
    user: AuthenticatedUser,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let vehicle = service.get_vehicle(&user, &path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(vehicle))
}

/// PUT /api/vehicles/{id}
pub async fn update_vehicle(
    service: web::Data<Arc<VehicleService>>,
    user: AuthenticatedUser,
    path: web::Path<String>,
    request: web::Json<UpdateVehicleRequest>,
) -> Result<HttpResponse, AppError> {
    let vehicle = service
        .update_vehicle(
            &user,
            &path.into_inner(),
            request.into_inner(),
            colombia_date(Utc::now()),
        )
        .await?;

    Ok(HttpResponse::Ok().json(vehicle))
}

/// DELETE /api/vehicles/{id}
pub async fn delete_vehicle(
    service: web::Data<Arc<VehicleService>>,
    user: AuthenticatedUser,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    service.delete_vehicle(&user, &path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Configure vehicle routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/vehicles")
            .route("", web::get().to(list_vehicles))
            .route("", web::post().to(create_vehicle))
            .route("/{id}", web::get().to(get_vehicle))
            .route("/{id}", web::put().to(update_vehicle))
            .route("/{id}", web::delete().to(delete_vehicle)),
    );
}
