use argon2::{
    Algorithm, Argon2, ParamsBuilder, PasswordHash, PasswordHasher, PasswordVerifier, Version,
    password_hash::SaltString,
};
use rand::RngCore;

use crate::session::{SessionError, SessionResult};

const SALT_LEN: usize = 16;
const TAG_LEN: usize = 96;

#[derive(Clone)]
pub struct PasswordService {
    argon2: Argon2<'static>,
}

impl PasswordService {
    pub fn new() -> SessionResult<Self> {
        let mut builder = ParamsBuilder::new();
        builder.m_cost(64 * 1024); // 64 MiB
        builder.t_cost(3);
        builder.p_cost(4);
        builder.output_len(TAG_LEN);
        let params = builder.build().map_err(SessionError::from)?;
        let argon2 = Argon2::new(Algorithm::Argon2i, Version::V0x13, params);
        Ok(Self { argon2 })
    }

    pub fn hash_password(&self, password: &str) -> SessionResult<String> {
        let mut salt_bytes = [0u8; SALT_LEN];
        rand::thread_rng().fill_bytes(&mut salt_bytes);
        let salt = SaltString::encode_b64(&salt_bytes).map_err(SessionError::from)?;
        let hash = self
            .argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(SessionError::from)?
            .to_string();
        Ok(hash)
    }

    /// Checks `password` against a stored hash. A mismatch is an `Ok(false)`,
    /// not an error; only malformed hashes and parameter failures bubble up.
    pub fn verify_password(&self, password: &str, encoded: &str) -> SessionResult<bool> {
        let parsed = PasswordHash::new(encoded)?;
        match self.argon2.verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(err) => Err(SessionError::from(err)),
        }
    }
}
