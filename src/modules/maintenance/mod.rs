// Maintenance module: service history and upcoming due dates per vehicle

pub mod controllers;
pub mod models;
pub mod repositories;
pub mod services;

pub use models::{MaintenanceRecord, MaintenanceType};
pub use repositories::MaintenanceRepository;
pub use services::MaintenanceService;
