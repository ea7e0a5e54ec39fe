pub mod vehicle_repository;

pub use vehicle_repository::{MySqlVehicleRepository, VehicleRepository};
