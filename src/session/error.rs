use rocket::http::Status;
use thiserror::Error;

/// Response body sent whenever a request lacks a usable session.
pub const NOT_LOGGED_IN: &str = "user not logged in";
/// Response body sent when a logged-in user hits a pre-login route.
pub const ALREADY_LOGGED_IN: &str = "user already logged in";

pub type SessionResult<T> = Result<T, SessionError>;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("{}", NOT_LOGGED_IN)]
    TokenMissing,
    #[error("{}", NOT_LOGGED_IN)]
    TokenInvalid,
    #[error("{}", ALREADY_LOGGED_IN)]
    GuardMismatch,
    #[error("configuration error: {0}")]
    Config(String),
    #[error("database error: {0}")]
    Sqlx(#[from] rocket_db_pools::sqlx::Error),
    #[error("jwt error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),
    #[error("argon2 parameter error: {0}")]
    Argon2(String),
    #[error("password hashing error: {0}")]
    PasswordHash(String),
}

impl SessionError {
    /// HTTP status this error maps to when it escapes a guard or route.
    ///
    /// Missing and invalid tokens are deliberately indistinguishable to the
    /// client: both surface as 401 with the same body.
    pub fn status(&self) -> Status {
        match self {
            SessionError::TokenMissing | SessionError::TokenInvalid => Status::Unauthorized,
            SessionError::GuardMismatch => Status::BadRequest,
            SessionError::Config(_)
            | SessionError::Sqlx(_)
            | SessionError::Jwt(_)
            | SessionError::Argon2(_)
            | SessionError::PasswordHash(_) => Status::InternalServerError,
        }
    }
}

impl From<argon2::Error> for SessionError {
    fn from(err: argon2::Error) -> Self {
        SessionError::Argon2(err.to_string())
    }
}

impl From<argon2::password_hash::Error> for SessionError {
    fn from(err: argon2::password_hash::Error) -> Self {
        SessionError::PasswordHash(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_errors_share_the_unauthorized_body() {
        assert_eq!(SessionError::TokenMissing.to_string(), NOT_LOGGED_IN);
        assert_eq!(SessionError::TokenInvalid.to_string(), NOT_LOGGED_IN);
        assert_eq!(SessionError::TokenMissing.status(), Status::Unauthorized);
        assert_eq!(SessionError::TokenInvalid.status(), Status::Unauthorized);
    }

    #[test]
    fn guard_mismatch_is_a_bad_request() {
        assert_eq!(SessionError::GuardMismatch.to_string(), ALREADY_LOGGED_IN);
        assert_eq!(SessionError::GuardMismatch.status(), Status::BadRequest);
    }

    #[test]
    fn infrastructure_errors_are_internal() {
        let err = SessionError::Config("missing key".into());
        assert_eq!(err.status(), Status::InternalServerError);
    }
}
