mod user;

pub use user::{
    is_valid_email, normalize_email, Session, SessionResponse, SignInRequest, SignUpRequest,
    User, UserResponse, UserRole,
};
