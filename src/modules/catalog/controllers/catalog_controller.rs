use actix_web::{web, HttpResponse};

use crate::modules::catalog::models::Catalog;

/// GET /api/catalog
pub async fn get_catalog() -> HttpResponse {
    HttpResponse::Ok().json(Catalog::build())
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/catalog", web::get().to(get_catalog));
}
