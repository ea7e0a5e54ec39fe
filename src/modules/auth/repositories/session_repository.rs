use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, MySqlPool};

use crate::core::{AppError, Result};
use crate::modules::auth::models::{Session, User};

#[async_trait]
pub trait SessionRepository: Send + Sync {
    async fn create(&self, session: &Session) -> Result<()>;

    /// Unexpired session for the token hash together with its user
    async fn find_active(
        &self,
        token_hash: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<(Session, User)>>;

    async fn delete_by_token_hash(&self, token_hash: &str) -> Result<bool>;

    /// Returns the number of purged sessions
    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64>;
}

#[derive(Debug, FromRow)]
struct SessionUserRow {
    session_id: String,
    user_id: String,
    token_hash: String,
    expires_at: DateTime<Utc>,
    session_created_at: DateTime<Utc>,
    name: String,
    email: String,
    password_hash: String,
    role: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl SessionUserRow {
    fn into_parts(self) -> Result<(Session, User)> {
        let user = User {
            id: self.user_id.clone(),
            name: self.name,
            email: self.email,
            password_hash: self.password_hash,
            role: self.role.parse().map_err(AppError::internal)?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        };
        let session = Session {
            id: self.session_id,
            user_id: self.user_id,
            token_hash: self.token_hash,
            expires_at: self.expires_at,
            created_at: self.session_created_at,
        };
        Ok((session, user))
    }
}

pub struct MySqlSessionRepository {
    pool: MySqlPool,
}

impl MySqlSessionRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionRepository for MySqlSessionRepository {
    async fn create(&self, session: &Session) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO sessions (id, user_id, token_hash, expires_at, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&session.id)
        .bind(&session.user_id)
        .bind(&session.token_hash)
        .bind(session.expires_at)
        .bind(session.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_active(
        &self,
        token_hash: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<(Session, User)>> {
        let row = sqlx::query_as::<_, SessionUserRow>(
            r#"
            SELECT
                s.id AS session_id, s.user_id, s.token_hash, s.expires_at,
                s.created_at AS session_created_at,
                u.name, u.email, u.password_hash, u.role, u.created_at, u.updated_at
            FROM sessions s
            INNER JOIN users u ON u.id = s.user_id
            WHERE s.token_hash = ? AND s.expires_at > ?
            LIMIT 1
            "#,
        )
        .bind(token_hash)
        .bind(now)
        .fetch_optional(&self.pool)
        .await?;

        row.map(SessionUserRow::into_parts).transpose()
    }

    async fn delete_by_token_hash(&self, token_hash: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM sessions WHERE token_hash = ?")
            .bind(token_hash)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64> {
        let result = sqlx::query("DELETE FROM sessions WHERE expires_at <= ?")
            .bind(now)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
