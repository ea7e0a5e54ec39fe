pub mod session_repository;
pub mod user_repository;

pub use session_repository::{MySqlSessionRepository, SessionRepository};
pub use user_repository::{MySqlUserRepository, UserRepository};
