//! Session module: RSA key configuration, token signing and verification,
//! the cookie gateway, password hashing, and Rocket request guards.

pub mod config;
pub mod cookie;
pub mod error;
pub mod guard;
pub mod passwords;
pub mod token;

pub use config::{SessionConfig, SessionKeys};
pub use cookie::{SESSION_COOKIE_NAME, SessionCookieGateway};
pub use error::{ALREADY_LOGGED_IN, NOT_LOGGED_IN, SessionError, SessionResult};
pub use guard::{
    GuardDecision, GuardPolicy, GuardRejection, LogoutSession, OptionalSession, RequireNoSession,
    SessionState, SessionUser, session_state,
};
pub use passwords::PasswordService;
pub use token::{SESSION_MAX_AGE_SECS, SessionClaims, TokenCodec, VerifyResult};
