use std::sync::Arc;

use actix_web::{web, HttpRequest, HttpResponse};
use chrono::Utc;

use crate::core::error::AppError;
use crate::middleware::auth::{bearer_token, AuthenticatedUser};
use crate::modules::auth::models::{SignInRequest, SignUpRequest};
use crate::modules::auth::services::AuthService;

/// POST /api/auth/sign-up
pub async fn sign_up(
    service: web::Data<Arc<AuthService>>,
    request: web::Json<SignUpRequest>,
) -> Result<HttpResponse, AppError> {
    let user = service.sign_up(request.into_inner()).await?;
    Ok(HttpResponse::Created().json(user))
}

/// POST /api/auth/sign-in
pub async fn sign_in(
    service: web::Data<Arc<AuthService>>,
    request: web::Json<SignInRequest>,
) -> Result<HttpResponse, AppError> {
    let session = service.sign_in(request.into_inner(), Utc::now()).await?;
    Ok(HttpResponse::Ok().json(session))
}

/// POST /api/auth/sign-out
pub async fn sign_out(
    service: web::Data<Arc<AuthService>>,
    _user: AuthenticatedUser,
    req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    let token = bearer_token(req.headers())
        .ok_or_else(|| AppError::unauthorized("Missing bearer token"))?;

    service.sign_out(token).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// GET /api/auth/session
pub async fn current_session(
    service: web::Data<Arc<AuthService>>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let user = service.current_user(&user.user_id).await?;
    Ok(HttpResponse::Ok().json(user))
}

/// Configure auth routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .route("/sign-up", web::post().to(sign_up))
            .route("/sign-in", web::post().to(sign_in))
            .route("/sign-out", web::post().to(sign_out))
            .route("/session", web::get().to(current_session)),
    );
}
