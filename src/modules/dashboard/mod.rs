// Dashboard: all-time totals and the latest trips

pub mod controllers;
pub mod models;
pub mod services;

pub use services::DashboardService;
