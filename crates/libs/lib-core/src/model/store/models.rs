//! Row types, one per table.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// User entity representing a complete user record from the database.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Data structure for creating a new user.
///
/// Password should be hashed before creating.
#[derive(Debug, Clone)]
pub struct UserForCreate {
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

impl UserForCreate {
    /// Create a new `UserForCreate` instance.
    pub fn new(username: String, email: String, password_hash: String) -> Self {
        Self {
            username,
            email,
            password_hash,
        }
    }
}

/// Issued session token. Rows are never deleted, only revoked.
#[derive(Debug, Clone, FromRow)]
pub struct UserToken {
    pub id: i64,
    pub user_id: i64,
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub revoked: bool,
    pub created_at: DateTime<Utc>,
}

impl UserToken {
    /// A token is valid iff it is not revoked and has not yet expired.
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        !self.revoked && self.expires_at > now
    }
}

/// The single ongoing conversation of a user.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Conversation {
    pub id: i64,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
}

/// One entry of a conversation log.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Message {
    pub id: i64,
    pub conversation_id: i64,
    pub message: String,
    pub is_user_message: bool,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn token(revoked: bool, expires_in: Duration) -> UserToken {
        let now = Utc::now();
        UserToken {
            id: 1,
            user_id: 1,
            token: "t".to_string(),
            expires_at: now + expires_in,
            revoked,
            created_at: now,
        }
    }

    #[test]
    fn test_token_validity_rule() {
        let now = Utc::now();
        assert!(token(false, Duration::hours(1)).is_valid_at(now));
        assert!(!token(true, Duration::hours(1)).is_valid_at(now));
        assert!(!token(false, Duration::hours(-1)).is_valid_at(now));
    }
}
