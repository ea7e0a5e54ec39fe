// Test Context
//
// Owns the in-memory store and the services built on top of it, and signs
// users in directly through the auth service.

use actix_web::dev::ServiceResponse;
use actix_web::http::StatusCode;
use chrono::Utc;

use transport_ops::app::AppState;
use transport_ops::modules::auth::models::{SignInRequest, SignUpRequest, UserRole};

use super::memory_store::MemoryStore;

pub const TEST_PASSWORD: &str = "secreto123";
const SESSION_TTL_HOURS: i64 = 24;

pub struct TestContext {
    pub store: MemoryStore,
    pub state: AppState,
}

impl TestContext {
    pub fn new() -> Self {
        let store = MemoryStore::new();
        let state = AppState::new(store.repositories(), SESSION_TTL_HOURS);
        Self { store, state }
    }

    /// Register an account with the given role and return a bearer token for it
    pub async fn token_for(&self, name: &str, email: &str, role: UserRole) -> String {
        let user = self
            .state
            .auth
            .sign_up(SignUpRequest {
                name: name.to_string(),
                email: email.to_string(),
                password: TEST_PASSWORD.to_string(),
                confirm_password: TEST_PASSWORD.to_string(),
            })
            .await
            .expect("sign-up should succeed");

        if role != UserRole::default() {
            let mut tables = self.store.lock();
            if let Some(stored) = tables.users.iter_mut().find(|u| u.id == user.id) {
                stored.role = role;
            }
        }

        self.state
            .auth
            .sign_in(
                SignInRequest {
                    email: email.to_string(),
                    password: TEST_PASSWORD.to_string(),
                },
                Utc::now(),
            )
            .await
            .expect("sign-in should succeed")
            .token
    }

    pub async fn operator_token(&self) -> String {
        self.token_for("Operador Principal", "operador@transportes.co", UserRole::Operator)
            .await
    }

    pub async fn viewer_token(&self) -> String {
        self.token_for("Consulta", "consulta@transportes.co", UserRole::Viewer)
            .await
    }
}

pub fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {}", token))
}

/// Status of a response, including errors raised by middleware before a handler ran
pub fn status_of<B>(result: Result<ServiceResponse<B>, actix_web::Error>) -> StatusCode {
    match result {
        Ok(response) => response.status(),
        Err(err) => err.as_response_error().status_code(),
    }
}
