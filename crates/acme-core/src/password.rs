//! # Password Hashing
//!
//! argon2id hashes for stored user passwords, in PHC string format
//! (`$argon2id$v=19$m=...$salt$hash`). Salt and parameters travel inside
//! the string, so verification needs nothing but the stored value.

use argon2::{
    password_hash::{rand_core::OsRng, SaltString},
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
};

use crate::error::{CoreError, CoreResult};

/// Hashes a plain-text password for storage.
///
/// Every call draws a fresh salt, so hashing the same password twice gives
/// two different strings that both verify.
pub fn hash_password(password: &str) -> CoreResult<String> {
    let salt = SaltString::generate(&mut OsRng);

    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| CoreError::PasswordHash(e.to_string()))?;

    Ok(hash.to_string())
}

/// Checks a plain-text password against a stored PHC string.
///
/// A malformed stored hash never matches.
pub fn verify_password(password: &str, hash: &str) -> bool {
    let parsed_hash = match PasswordHash::new(hash) {
        Ok(h) => h,
        Err(_) => return false,
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}
