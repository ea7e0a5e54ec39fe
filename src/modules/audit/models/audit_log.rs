use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AuditAction {
    Create,
    Update,
    Delete,
}

impl std::fmt::Display for AuditAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuditAction::Create => write!(f, "CREATE"),
            AuditAction::Update => write!(f, "UPDATE"),
            AuditAction::Delete => write!(f, "DELETE"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AuditEntity {
    Vehicle,
    Trip,
    Expense,
    Maintenance,
}

impl std::fmt::Display for AuditEntity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuditEntity::Vehicle => write!(f, "VEHICLE"),
            AuditEntity::Trip => write!(f, "TRIP"),
            AuditEntity::Expense => write!(f, "EXPENSE"),
            AuditEntity::Maintenance => write!(f, "MAINTENANCE"),
        }
    }
}

/// One audit trail entry; `changes` holds the request body that caused it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditLog {
    pub id: String,
    pub user_id: String,
    pub action: AuditAction,
    pub entity: AuditEntity,
    pub entity_id: String,
    pub changes: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
}

impl AuditLog {
    pub fn new(
        user_id: &str,
        action: AuditAction,
        entity: AuditEntity,
        entity_id: &str,
        changes: Option<serde_json::Value>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            action,
            entity,
            entity_id: entity_id.to_string(),
            changes,
            created_at: Utc::now(),
        }
    }
}
