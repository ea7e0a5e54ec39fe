use std::sync::Arc;

use actix_web::{web, HttpResponse};

use crate::core::error::AppError;
use crate::middleware::auth::AuthenticatedUser;
use crate::modules::dashboard::services::DashboardService;

/// GET /api/dashboard
pub async fn get_dashboard(
    service: web::Data<Arc<DashboardService>>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let summary = service.summary(&user).await?;
    Ok(HttpResponse::Ok().json(summary))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/dashboard", web::get().to(get_dashboard));
}
