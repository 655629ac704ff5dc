//! # Authentication Library
//!
//! Password hashing and signed session token management.

pub mod error;
pub mod pwd;
pub mod token;

// Re-export commonly used types
pub use error::{Error, Result};
pub use pwd::{check_password_hash, hash_password, MIN_PASSWORD_LEN};
pub use token::{decode_token, generate_token, Claims, SignedToken};
