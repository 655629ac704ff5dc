//! # Session Tokens
//!
//! Signed (HS256 JWT), time-limited session tokens. The token embeds the
//! username and an absolute expiration; the signing key is supplied by the
//! caller from configuration.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};

/// JWT Claims structure containing user authentication information.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (username)
    pub sub: String,
    /// Unique token id, keeps two tokens minted in the same second distinct
    pub jti: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at time (Unix timestamp)
    pub iat: i64,
}

/// A freshly signed token together with the expiry embedded in it.
#[derive(Debug, Clone)]
pub struct SignedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Sign a token for `username` that expires `ttl` from now.
pub fn generate_token(username: &str, secret: &str, ttl: Duration) -> Result<SignedToken> {
    if ttl <= Duration::zero() {
        return Err(Error::TokenTtl);
    }

    let now = lib_utils::now_utc();
    let expires_at = now + ttl;

    let claims = Claims {
        sub: username.to_string(),
        jti: Uuid::new_v4().to_string(),
        exp: expires_at.timestamp(),
        iat: now.timestamp(),
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| Error::TokenEncode(e.to_string()))?;

    Ok(SignedToken { token, expires_at })
}

/// Verify signature and expiry, returning the claims.
pub fn decode_token(token: &str, secret: &str) -> Result<Claims> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|e| Error::TokenInvalid(e.to_string()))?;

    Ok(token_data.claims)
}
