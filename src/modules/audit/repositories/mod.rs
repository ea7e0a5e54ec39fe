pub mod audit_repository;

pub use audit_repository::{record_best_effort, AuditRepository, MySqlAuditRepository};
