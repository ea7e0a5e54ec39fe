//! Transport operator backend
//!
//! Fleet, trip, expense and maintenance bookkeeping for a Colombian road
//! transport company, with trip financials derived from fixed deduction and
//! margin rates and es-CO formatted reporting.

pub mod app;
pub mod config;
pub mod core;
pub mod middleware;
pub mod modules;

// Re-export commonly used types
pub use modules::expenses;
pub use modules::maintenance;
pub use modules::trips;
pub use modules::vehicles;
