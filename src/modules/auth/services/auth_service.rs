use std::sync::Arc;

use argon2::{
    password_hash::{
        rand_core::{OsRng, RngCore},
        PasswordHasher, SaltString,
    },
    Argon2, PasswordHash, PasswordVerifier,
};
use chrono::{DateTime, Duration, Utc};
use sha2::{Digest, Sha256};
use tracing::{info, warn};
use uuid::Uuid;

use crate::core::{AppError, Result};
use crate::middleware::auth::AuthenticatedUser;
use crate::modules::auth::models::{
    normalize_email, Session, SessionResponse, SignInRequest, SignUpRequest, User, UserResponse,
};
use crate::modules::auth::repositories::{SessionRepository, UserRepository};

const TOKEN_BYTES: usize = 32;
const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// Hash a password using Argon2
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::internal(format!("Failed to hash password: {}", e)))
}

/// Verify a password against a stored Argon2 hash
pub fn verify_password(password: &str, hash: &str) -> Result<bool> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| AppError::internal(format!("Invalid hash format: {}", e)))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// Random bearer token, hex encoded
pub fn generate_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Lookup key of a bearer token: SHA-256, hex encoded
pub fn hash_token(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}

/// Service for accounts and bearer sessions
pub struct AuthService {
    user_repo: Arc<dyn UserRepository>,
    session_repo: Arc<dyn SessionRepository>,
    session_ttl: Duration,
}

impl AuthService {
    pub fn new(
        user_repo: Arc<dyn UserRepository>,
        session_repo: Arc<dyn SessionRepository>,
        session_ttl_hours: i64,
    ) -> Self {
        Self {
            user_repo,
            session_repo,
            session_ttl: Duration::hours(session_ttl_hours),
        }
    }

    pub async fn sign_up(&self, request: SignUpRequest) -> Result<UserResponse> {
        request.validate()?;

        let email = normalize_email(&request.email);
        if self.user_repo.find_by_email(&email).await?.is_some() {
            return Err(AppError::conflict("Email is already registered"));
        }

        let password_hash = hash_password(&request.password)?;
        let user = User::new(&request.name, &email, password_hash, Utc::now());
        let created = self.user_repo.create(&user).await?;

        info!(user_id = %created.id, role = %created.role, "User registered");

        Ok(UserResponse::from(&created))
    }

    /// Unknown email and wrong password fail the same way
    pub async fn sign_in(
        &self,
        request: SignInRequest,
        now: DateTime<Utc>,
    ) -> Result<SessionResponse> {
        request.validate()?;

        let email = normalize_email(&request.email);
        let Some(user) = self.user_repo.find_by_email(&email).await? else {
            warn!("Sign-in attempt for unknown email");
            return Err(AppError::unauthorized(INVALID_CREDENTIALS));
        };

        if !verify_password(&request.password, &user.password_hash)? {
            warn!(user_id = %user.id, "Sign-in attempt with wrong password");
            return Err(AppError::unauthorized(INVALID_CREDENTIALS));
        }

        let token = generate_token();
        let session = Session {
            id: Uuid::new_v4().to_string(),
            user_id: user.id.clone(),
            token_hash: hash_token(&token),
            expires_at: now + self.session_ttl,
            created_at: now,
        };
        self.session_repo.create(&session).await?;

        info!(user_id = %user.id, expires_at = %session.expires_at, "Session started");

        Ok(SessionResponse {
            token,
            expires_at: session.expires_at,
            user: UserResponse::from(&user),
        })
    }

    pub async fn sign_out(&self, token: &str) -> Result<()> {
        if !self
            .session_repo
            .delete_by_token_hash(&hash_token(token))
            .await?
        {
            return Err(AppError::unauthorized("Session not found"));
        }
        Ok(())
    }

    /// Resolve a bearer token into the caller's identity
    pub async fn authenticate(&self, token: &str, now: DateTime<Utc>) -> Result<AuthenticatedUser> {
        let (session, user) = self
            .session_repo
            .find_active(&hash_token(token), now)
            .await?
            .ok_or_else(|| AppError::unauthorized("Invalid or expired session"))?;

        if session.is_expired(now) {
            return Err(AppError::unauthorized("Invalid or expired session"));
        }

        Ok(AuthenticatedUser {
            user_id: user.id,
            email: user.email,
            name: user.name,
            role: user.role,
        })
    }

    pub async fn current_user(&self, user_id: &str) -> Result<UserResponse> {
        self.user_repo
            .find_by_id(user_id)
            .await?
            .map(|user| UserResponse::from(&user))
            .ok_or_else(|| AppError::unauthorized("User no longer exists"))
    }

    pub async fn purge_expired_sessions(&self, now: DateTime<Utc>) -> Result<u64> {
        let purged = self.session_repo.delete_expired(now).await?;
        if purged > 0 {
            info!(purged, "Expired sessions removed");
        }
        Ok(purged)
    }
}
