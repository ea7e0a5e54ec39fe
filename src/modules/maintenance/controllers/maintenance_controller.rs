use std::sync::Arc;

use actix_web::{web, HttpResponse};
use chrono::Utc;

use crate::core::dates::colombia_date;
use crate::core::error::AppError;
use crate::middleware::auth::AuthenticatedUser;
use crate::modules::maintenance::models::{
    CreateMaintenanceRequest, MaintenanceListQuery, UpcomingQuery, UpdateMaintenanceRequest,
};
use crate::modules::maintenance::services::MaintenanceService;

/// GET /api/maintenance
pub async fn list_records(
    service: web::Data<Arc<MaintenanceService>>,
    user: AuthenticatedUser,
    query: web::Query<MaintenanceListQuery>,
) -> Result<HttpResponse, AppError> {
    let records = service
        .list_records(&user, query.vehicle_id.as_deref())
        .await?;

    Ok(HttpResponse::Ok().json(records))
}

/// GET /api/maintenance/upcoming?days=N
pub async fn upcoming(
    service: web::Data<Arc<MaintenanceService>>,
    user: AuthenticatedUser,
    query: web::Query<UpcomingQuery>,
) -> Result<HttpResponse, AppError> {
    let days = query.window_days()?;
    let records = service
        .upcoming(&user, colombia_date(Utc::now()), days)
        .await?;

    Ok(HttpResponse::Ok().json(records))
}

/// POST /api/maintenance
pub async fn create_record(
    service: web::Data<Arc<MaintenanceService>>,
    user: AuthenticatedUser,
    request: web::Json<CreateMaintenanceRequest>,
) -> Result<HttpResponse, AppError> {
    let record = service.create_record(&user, request.into_inner()).await?;
    Ok(HttpResponse::Created().json(record))
}

/// GET /api/maintenance/{id}
pub async fn get_record(
    service: web::Data<Arc<MaintenanceService>>,
    user: AuthenticatedUser,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let record = service.get_record(&user, &path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(record))
}

/// PUT /api/maintenance/{id}
pub async fn update_record(
    service: web::Data<Arc<MaintenanceService>>,
    user: AuthenticatedUser,
    path: web::Path<String>,
    request: web::Json<UpdateMaintenanceRequest>,
) -> Result<HttpResponse, AppError> {
    let record = service
        .update_record(&user, &path.into_inner(), request.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(record))
}

/// DELETE /api/maintenance/{id}
pub async fn delete_record(
    service: web::Data<Arc<MaintenanceService>>,
    user: AuthenticatedUser,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    service.delete_record(&user, &path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Configure maintenance routes; `/upcoming` is registered before `/{id}`
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/maintenance")
            .route("", web::get().to(list_records))
            .route("", web::post().to(create_record))
            .route("/upcoming", web::get().to(upcoming))
            .route("/{id}", web::get().to(get_record))
            .route("/{id}", web::put().to(update_record))
            .route("/{id}", web::delete().to(delete_record)),
    );
}
