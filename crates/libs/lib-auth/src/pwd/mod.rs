//! # Password Hashing
//!
//! Password hashing and verification using Argon2.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::error::{Error, Result};

/// Shortest password accepted when an account is created.
pub const MIN_PASSWORD_LEN: usize = 8;

/// Hash a password with Argon2id and a fresh random salt.
///
/// Returns the PHC string (algorithm, params, salt and digest in one value),
/// so verification needs nothing but the stored string.
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| Error::PwdHash(e.to_string()))?
        .to_string();

    Ok(password_hash)
}

/// Check a plaintext password against a stored Argon2 hash.
///
/// Never errors: a mismatch or an unparsable hash both yield `false`.
/// The digest comparison inside the verifier is constant-time.
pub fn check_password_hash(password: &str, hash: &str) -> bool {
    let Ok(parsed_hash) = PasswordHash::new(hash) else {
        return false;
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}
