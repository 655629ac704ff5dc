//! # Auth Errors

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// The hashing library failed (entropy source, parameters).
    #[error("Failed to hash password: {0}")]
    PwdHash(String),

    #[error("Failed to encode token: {0}")]
    TokenEncode(String),

    /// Bad signature, malformed token, or expired `exp` claim.
    #[error("Invalid token: {0}")]
    TokenInvalid(String),

    #[error("Token TTL must be positive")]
    TokenTtl,
}
