//! Service wiring shared by the binary and the HTTP tests.
//!
//! Repositories are injected as trait objects so the same route table runs
//! against MySQL in production and in-memory stores in tests.

use std::sync::Arc;

use actix_web::web;
use sqlx::MySqlPool;

use crate::middleware::auth::SessionAuth;
use crate::middleware::error_handler;
use crate::modules::audit::repositories::{AuditRepository, MySqlAuditRepository};
use crate::modules::auth::repositories::{
    MySqlSessionRepository, MySqlUserRepository, SessionRepository, UserRepository,
};
use crate::modules::auth::services::AuthService;
use crate::modules::dashboard::services::DashboardService;
use crate::modules::expenses::repositories::{ExpenseRepository, MySqlExpenseRepository};
use crate::modules::expenses::services::ExpenseService;
use crate::modules::maintenance::repositories::{
    MaintenanceRepository, MySqlMaintenanceRepository,
};
use crate::modules::maintenance::services::MaintenanceService;
use crate::modules::reports::services::ReportService;
use crate::modules::trips::repositories::{MySqlTripRepository, TripRepository};
use crate::modules::trips::services::TripService;
use crate::modules::vehicles::repositories::{MySqlVehicleRepository, VehicleRepository};
use crate::modules::vehicles::services::VehicleService;
use crate::modules::{auth, catalog, dashboard, expenses, maintenance, reports, trips, vehicles};

/// One handle per persistence concern
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub sessions: Arc<dyn SessionRepository>,
    pub vehicles: Arc<dyn VehicleRepository>,
    pub trips: Arc<dyn TripRepository>,
    pub expenses: Arc<dyn ExpenseRepository>,
    pub maintenance: Arc<dyn MaintenanceRepository>,
    pub audit: Arc<dyn AuditRepository>,
}

impl Repositories {
    pub fn mysql(pool: &MySqlPool) -> Self {
        Self {
            users: Arc::new(MySqlUserRepository::new(pool.clone())),
            sessions: Arc::new(MySqlSessionRepository::new(pool.clone())),
            vehicles: Arc::new(MySqlVehicleRepository::new(pool.clone())),
            trips: Arc::new(MySqlTripRepository::new(pool.clone())),
            expenses: Arc::new(MySqlExpenseRepository::new(pool.clone())),
            maintenance: Arc::new(MySqlMaintenanceRepository::new(pool.clone())),
            audit: Arc::new(MySqlAuditRepository::new(pool.clone())),
        }
    }
}

/// Services handed to the handlers through `web::Data`
#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AuthService>,
    pub vehicles: Arc<VehicleService>,
    pub trips: Arc<TripService>,
    pub expenses: Arc<ExpenseService>,
    pub maintenance: Arc<MaintenanceService>,
    pub dashboard: Arc<DashboardService>,
    pub reports: Arc<ReportService>,
}

impl AppState {
    pub fn new(repos: Repositories, session_ttl_hours: i64) -> Self {
        Self {
            auth: Arc::new(AuthService::new(
                repos.users.clone(),
                repos.sessions.clone(),
                session_ttl_hours,
            )),
            vehicles: Arc::new(VehicleService::new(
                repos.vehicles.clone(),
                repos.trips.clone(),
                repos.audit.clone(),
            )),
            trips: Arc::new(TripService::new(
                repos.trips.clone(),
                repos.vehicles.clone(),
                repos.expenses.clone(),
                repos.audit.clone(),
            )),
            expenses: Arc::new(ExpenseService::new(
                repos.expenses.clone(),
                repos.trips.clone(),
                repos.audit.clone(),
            )),
            maintenance: Arc::new(MaintenanceService::new(
                repos.maintenance.clone(),
                repos.vehicles.clone(),
                repos.audit.clone(),
            )),
            dashboard: Arc::new(DashboardService::new(
                repos.trips.clone(),
                repos.vehicles.clone(),
                repos.expenses.clone(),
            )),
            reports: Arc::new(ReportService::new(
                repos.trips,
                repos.expenses,
                repos.maintenance,
            )),
        }
    }
}

/// Register the `/api` scope: extractor configs, service data, session guard, routes
pub fn configure_api(state: AppState) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg: &mut web::ServiceConfig| {
        error_handler::configure(cfg);

        cfg.app_data(web::Data::new(state.auth.clone()))
            .app_data(web::Data::new(state.vehicles.clone()))
            .app_data(web::Data::new(state.trips.clone()))
            .app_data(web::Data::new(state.expenses.clone()))
            .app_data(web::Data::new(state.maintenance.clone()))
            .app_data(web::Data::new(state.dashboard.clone()))
            .app_data(web::Data::new(state.reports.clone()));

        cfg.service(
            web::scope("/api")
                .wrap(SessionAuth::new(state.auth.clone()))
                .configure(auth::controllers::configure)
                .configure(catalog::controllers::configure)
                .configure(vehicles::controllers::configure)
                .configure(trips::controllers::configure)
                .configure(expenses::controllers::configure)
                .configure(maintenance::controllers::configure)
                .configure(dashboard::controllers::configure)
                .configure(reports::controllers::configure),
        );
    }
}
