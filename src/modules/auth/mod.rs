// Accounts, roles and bearer sessions

pub mod controllers;
pub mod models;
pub mod repositories;
pub mod services;

pub use models::{User, UserRole};
pub use repositories::{SessionRepository, UserRepository};
pub use services::AuthService;
