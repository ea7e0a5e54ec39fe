use actix_cors::Cors;
use actix_web::{http::header, web, App, HttpServer};
use anyhow::Context;
use tracing_actix_web::TracingLogger;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use transport_ops::app::{configure_api, AppState, Repositories};
use transport_ops::config::{Config, DatabaseConfig};
use transport_ops::middleware::{RateLimiter, RequestId};
use transport_ops::modules::health;

fn init_tracing(log_level: &str, log_format: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("transport_ops={},actix_web=info", log_level).into());

    let registry = tracing_subscriber::registry().with(filter);

    if log_format == "json" {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

fn cors(allowed_origin: Option<&str>) -> Cors {
    let cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "PUT", "DELETE"])
        .allowed_headers(vec![header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .max_age(3600);

    match allowed_origin {
        Some(origin) => cors.allowed_origin(origin),
        None => cors.allow_any_origin(),
    }
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env().context("Failed to load configuration")?;
    config.validate().context("Configuration validation failed")?;

    init_tracing(&config.app.log_level, &config.app.log_format);

    tracing::info!(
        env = %config.app.env,
        bind = %config.server.bind_address(),
        workers = config.server.workers,
        "Starting transport operations backend"
    );

    let db_pool = config
        .database
        .create_pool()
        .await
        .context("Failed to create database pool")?;

    tracing::info!(
        min = config.database.pool_size,
        max = config.database.max_connections,
        "Database pool initialized"
    );

    if config.app.run_migrations {
        DatabaseConfig::run_migrations(&db_pool)
            .await
            .context("Failed to run migrations")?;
        tracing::info!("Migrations applied");
    }

    let state = AppState::new(
        Repositories::mysql(&db_pool),
        config.security.session_ttl_hours,
    );

    if let Err(e) = state.auth.purge_expired_sessions(chrono::Utc::now()).await {
        tracing::warn!(error = %e, "Could not purge expired sessions");
    }

    let rate_limit = config.security.rate_limit_per_minute;
    let cors_origin = config.security.cors_allowed_origin.clone();
    let bind_address = config.server.bind_address();

    HttpServer::new(move || {
        App::new()
            .wrap(cors(cors_origin.as_deref()))
            .wrap(RateLimiter::new(rate_limit))
            .wrap(RequestId)
            .wrap(TracingLogger::default())
            .app_data(web::Data::new(db_pool.clone()))
            .configure(health::controllers::configure)
            .configure(configure_api(state.clone()))
    })
    .workers(config.server.workers)
    .bind(&bind_address)
    .with_context(|| format!("Failed to bind {}", bind_address))?
    .run()
    .await
    .context("HTTP server terminated with an error")?;

    Ok(())
}
