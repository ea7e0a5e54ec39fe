use async_trait::async_trait;
use sqlx::MySqlPool;

use crate::core::Result;
use crate::modules::audit::models::{AuditAction, AuditEntity, AuditLog};

#[async_trait]
pub trait AuditRepository: Send + Sync {
    async fn record(&self, entry: &AuditLog) -> Result<()>;
}

pub struct MySqlAuditRepository {
    pool: MySqlPool,
}

impl MySqlAuditRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuditRepository for MySqlAuditRepository {
    async fn record(&self, entry: &AuditLog) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO audit_logs (id, user_id, action, entity, entity_id, changes, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&entry.id)
        .bind(&entry.user_id)
        .bind(entry.action.to_string())
        .bind(entry.entity.to_string())
        .bind(&entry.entity_id)
        .bind(entry.changes.as_ref().map(|c| c.to_string()))
        .bind(entry.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

/// Write an audit entry without failing the request that triggered it
pub async fn record_best_effort(
    repo: &dyn AuditRepository,
    user_id: &str,
    action: AuditAction,
    entity: AuditEntity,
    entity_id: &str,
    changes: Option<serde_json::Value>,
) {
    let entry = AuditLog::new(user_id, action, entity, entity_id, changes);

    if let Err(e) = repo.record(&entry).await {
        tracing::warn!(
            error = %e,
            entity = %entity,
            entity_id = %entity_id,
            action = %action,
            "Failed to write audit log entry"
        );
    }
}
