//! Password hashing with Argon2 (bcrypt hashes from older accounts still verify)

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug)]
pub enum PasswordError {
    #[error("Hash error: {0}")]
    HashError(String),
    #[error("Unsupported hash format")]
    UnsupportedFormat,
}

pub struct PasswordService;

impl PasswordService {
    pub fn hash(password: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();
        argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|h| h.to_string())
            .map_err(|e| PasswordError::HashError(e.to_string()))
    }

    pub fn verify(password: &str, hash: &str) -> Result<bool, PasswordError> {
        if Self::is_bcrypt(hash) {
            debug!("Verifying legacy bcrypt hash");
            return bcrypt::verify(password, hash).map_err(|e| PasswordError::HashError(e.to_string()));
        }
        if !hash.starts_with("$argon2") {
            warn!("Stored password is not a recognised hash");
            return Err(PasswordError::UnsupportedFormat);
        }
        let parsed_hash = PasswordHash::new(hash)
            .map_err(|e| PasswordError::HashError(e.to_string()))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    fn is_bcrypt(hash: &str) -> bool {
        ["$2a$", "$2b$", "$2y$"].iter().any(|p| hash.starts_with(p))
    }
}
