//! # Authentication Data Transfer Objects
//!
//! Request and response structures for the authentication endpoints.
//!
//! ## Endpoints Using These DTOs
//!
//! - `POST /auth/register` - [`RegisterRequest`] -> [`UserInfo`]
//! - `POST /auth/login` - [`LoginRequest`] -> [`LoginResponse`]
//! - `POST /auth/logout` - (bearer token) -> [`MessageResponse`]
//! - `GET /auth/validate?token=...` - [`ValidateTokenQuery`] -> [`ValidateTokenResponse`]
//!
//! ## Login Flow
//!
//! ```text
//! POST /auth/login
//! Content-Type: application/json
//!
//! { "username": "alice", "password": "MyPassword123!" }
//! ```
//!
//! Response:
//! ```text
//! {
//!   "token": "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...",
//!   "expires_at": "2024-01-01T01:00:00Z",
//!   "user": { "id": 1, "username": "alice", "email": "alice@example.com" }
//! }
//! ```
//!
//! The token is then sent on protected routes as `Authorization: Bearer <token>`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::store::models::User;

/// Registration request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Login request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Public user data. Never carries the password hash.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserInfo {
    pub id: i64,
    pub username: String,
    pub email: String,
}

impl From<&User> for UserInfo {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
        }
    }
}

/// Successful login: the bearer token and when it stops being valid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub user: UserInfo,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ValidateTokenQuery {
    pub token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidateTokenResponse {
    pub valid: bool,
}

/// Plain acknowledgement body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}
