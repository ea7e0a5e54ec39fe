use std::sync::Arc;

use actix_web::{web, HttpResponse};
use chrono::Utc;

use crate::core::dates::colombia_date;
use crate::core::error::AppError;
use crate::middleware::auth::AuthenticatedUser;
use crate::modules::expenses::models::{
    CreateExpenseRequest, ExpenseListQuery, UpdateExpenseRequest,
};
use crate::modules::expenses::services::ExpenseService;

/// GET /api/expenses
pub async fn list_expenses(
    service: web::Data<Arc<ExpenseService>>,
    user: AuthenticatedUser,
    query: web::Query<ExpenseListQuery>,
) -> Result<HttpResponse, AppError> {
    let expenses = service
        .list_expenses(&user, query.into_inner(), colombia_date(Utc::now()))
        .await?;

    Ok(HttpResponse::Ok().json(expenses))
}

/// POST /api/expenses
pub async fn create_expense(
    service: web::Data<Arc<ExpenseService>>,
    user: AuthenticatedUser,
    request: web::Json<CreateExpenseRequest>,
) -> Result<HttpResponse, AppError> {
    let expense = service.create_expense(&user, request.into_inner()).await?;
    Ok(HttpResponse::Created().json(expense))
}

/// GET /api/expenses/{id}
pub async fn get_expense(
    service: web::Data<Arc<ExpenseService>>,
    user: AuthenticatedUser,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let expense = service.get_expense(&user, &path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(expense))
}

/// PUT /api/expenses/{id}
pub async fn update_expense(
    service: web::Data<Arc<ExpenseService>>,
    user: AuthenticatedUser,
    path: web::Path<String>,
    request: web::Json<UpdateExpenseRequest>,
) -> Result<HttpResponse, AppError> {
    let expense = service
        .update_expense(&user, &path.into_inner(), request.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(expense))
}

/// DELETE /api/expenses/{id}
pub async fn delete_expense(
    service: web::Data<Arc<ExpenseService>>,
    user: AuthenticatedUser,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    service.delete_expense(&user, &path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Configure expense routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/expenses")
            .route("", web::get().to(list_expenses))
            .route("", web::post().to(create_expense))
            .route("/{id}", web::get().to(get_expense))
            .route("/{id}", web::put().to(update_expense))
            .route("/{id}", web::delete().to(delete_expense)),
    );
}
