//! Password hashing and verification, Argon2id with default parameters.
//!
//! Hashes are stored as PHC-format strings (e.g.
//! `$argon2id$v=19$m=19456,t=2,p=1$...`) in the `password_hash` column of the
//! `users` table. Plaintext passwords never touch the database.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use crate::error::ApiError;

/// Hash a plaintext password with a fresh random salt.
pub fn hash(password: &str) -> Result<String, ApiError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| ApiError::Internal(format!("failed to hash password: {e}")))
}

/// Check a plaintext password against a stored PHC string. `Ok(false)` on
/// mismatch; `Err` only when the stored hash itself is malformed.
pub fn verify(password: &str, stored: &str) -> Result<bool, ApiError> {
    let parsed = PasswordHash::new(stored)
        .map_err(|e| ApiError::Internal(format!("stored password hash is malformed: {e}")))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}
