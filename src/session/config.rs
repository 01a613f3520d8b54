use std::path::PathBuf;

use jsonwebtoken::{DecodingKey, EncodingKey};

use crate::session::{SessionError, SessionResult};

/// Session configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub private_key_path: PathBuf,
    pub public_key_path: PathBuf,
    pub cookie_secure: bool,
}

impl SessionConfig {
    pub fn from_env() -> Self {
        let private_key_path = std::env::var("TODO_PRIVATE_KEY_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| "private.pem".into());
        let public_key_path = std::env::var("TODO_PUBLIC_KEY_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| "public.pem".into());
        let cookie_secure = std::env::var("TODO_COOKIE_SECURE")
            .map(|value| matches!(value.as_str(), "1" | "true" | "TRUE" | "yes" | "on"))
            .unwrap_or(cfg!(not(debug_assertions)));

        Self {
            private_key_path,
            public_key_path,
            cookie_secure,
        }
    }
}

/// RSA key pair used to sign and verify session tokens.
pub struct SessionKeys {
    pub encoding_key: EncodingKey,
    pub decoding_key: DecodingKey,
}

// `EncodingKey`/`DecodingKey` do not implement `Debug`, so the key material
// is redacted here.
impl std::fmt::Debug for SessionKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionKeys").finish_non_exhaustive()
    }
}

impl SessionKeys {
    /// Reads both PEM files named by the config.
    pub fn load(config: &SessionConfig) -> SessionResult<Self> {
        let private_pem = std::fs::read(&config.private_key_path).map_err(|err| {
            SessionError::Config(format!(
                "unable to read signing key {}: {err}",
                config.private_key_path.display()
            ))
        })?;
        let public_pem = std::fs::read(&config.public_key_path).map_err(|err| {
            SessionError::Config(format!(
                "unable to read verification key {}: {err}",
                config.public_key_path.display()
            ))
        })?;
        Self::from_pem(&private_pem, &public_pem)
    }

    pub fn from_pem(private_pem: &[u8], public_pem: &[u8]) -> SessionResult<Self> {
        let encoding_key = EncodingKey::from_rsa_pem(private_pem)?;
        let decoding_key = DecodingKey::from_rsa_pem(public_pem)?;
        Ok(Self {
            encoding_key,
            decoding_key,
        })
    }
}
