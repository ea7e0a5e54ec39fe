// Period reports: week, month or year summaries with es-CO display strings

pub mod controllers;
pub mod models;
pub mod services;

pub use models::PeriodReport;
pub use services::ReportService;
