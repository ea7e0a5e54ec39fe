pub mod maintenance_repository;

pub use maintenance_repository::{MaintenanceRepository, MySqlMaintenanceRepository};
