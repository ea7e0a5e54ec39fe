// Audit trail of create/update/delete operations

pub mod models;
pub mod repositories;

pub use models::{AuditAction, AuditEntity, AuditLog};
pub use repositories::AuditRepository;
