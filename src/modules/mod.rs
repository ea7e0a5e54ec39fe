pub mod audit;
pub mod auth;
pub mod catalog;
pub mod dashboard;
pub mod expenses;
pub mod health;
pub mod maintenance;
pub mod reports;
pub mod trips;
pub mod vehicles;
