pub mod auth;
pub mod error_handler;
pub mod rate_limit;
pub mod request_id;

pub use auth::{bearer_token, AuthenticatedUser, SessionAuth};
pub use rate_limit::RateLimiter;
pub use request_id::RequestId;
