use std::sync::Arc;

use actix_web::{web, HttpResponse};
use chrono::Utc;

use crate::core::dates::colombia_date;
use crate::core::error::AppError;
use crate::middleware::auth::AuthenticatedUser;
use crate::modules::reports::models::ReportQuery;
use crate::modules::reports::services::ReportService;

/// GET /api/reports/summary?period=week|month|year&date=YYYY-MM-DD
pub async fn period_summary(
    service: web::Data<Arc<ReportService>>,
    user: AuthenticatedUser,
    query: web::Query<ReportQuery>,
) -> Result<HttpResponse, AppError> {
    let reference = query.date.unwrap_or_else(|| colombia_date(Utc::now()));
    let report = service
        .period_summary(&user, query.period_or_default(), reference)
        .await?;

    Ok(HttpResponse::Ok().json(report))
}

/// Configure report routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/reports").route("/summary", web::get().to(period_summary)));
}
