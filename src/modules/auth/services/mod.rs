pub mod auth_service;

pub use auth_service::{hash_password, hash_token, verify_password, AuthService};
