use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::models::User;
use crate::session::{SessionKeys, SessionResult};

/// Sessions live for fifteen minutes from the moment of signing. Every
/// authenticated request re-signs, so the window slides while the user is
/// active and only lapses after fifteen idle minutes.
pub const SESSION_MAX_AGE_SECS: i64 = 15 * 60;

/// Token payload: the public user profile plus the standard time claims.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    #[serde(flatten)]
    pub user: User,
    pub iat: i64,
    pub exp: i64,
}

/// Outcome of token verification. Every failure mode collapses into
/// `Invalid`; callers never learn whether the signature, the expiry, or the
/// shape of the payload was at fault.
#[derive(Debug, Clone)]
pub enum VerifyResult {
    Valid(User),
    Invalid,
}

/// Signs and verifies RS256 session tokens.
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    max_age: Duration,
}

impl TokenCodec {
    pub fn new(keys: SessionKeys) -> Self {
        let mut validation = Validation::new(Algorithm::RS256);
        validation.leeway = 0;

        Self {
            encoding_key: keys.encoding_key,
            decoding_key: keys.decoding_key,
            validation,
            max_age: Duration::seconds(SESSION_MAX_AGE_SECS),
        }
    }

    /// Signs a fresh token for `user`, stamped with the current time.
    ///
    /// Refreshing an existing session is this same call on the verified
    /// payload: the user fields carry over and both time claims are re-stamped.
    pub fn sign(&self, user: &User) -> SessionResult<String> {
        let now = Utc::now();
        let claims = SessionClaims {
            user: user.clone(),
            iat: now.timestamp(),
            exp: (now + self.max_age).timestamp(),
        };

        let token = encode(&Header::new(Algorithm::RS256), &claims, &self.encoding_key)?;
        Ok(token)
    }

    /// Verifies a token and extracts its user payload.
    ///
    /// On top of signature and `exp` validation, the fifteen minute window is
    /// enforced from the token's own `iat`. A token older than the window is
    /// invalid no matter what its `exp` claims, and so is one stamped in the
    /// future.
    pub fn verify(&self, token: &str) -> VerifyResult {
        let data = match decode::<SessionClaims>(token, &self.decoding_key, &self.validation) {
            Ok(data) => data,
            Err(_) => return VerifyResult::Invalid,
        };

        let age = Utc::now().timestamp() - data.claims.iat;
        if age < 0 || age >= self.max_age.num_seconds() {
            return VerifyResult::Invalid;
        }

        VerifyResult::Valid(data.claims.user)
    }

    pub fn max_age(&self) -> Duration {
        self.max_age
    }
}
