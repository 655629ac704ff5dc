//! # Token Repository
//!
//! Issued session tokens. Rows are inserted at login and only ever flipped to
//! `revoked`; nothing deletes them except the user cascade.

use super::models::UserToken;
use super::DbPool;
use chrono::{DateTime, Utc};
use sqlx::query_as;

pub struct TokenRepository;

impl TokenRepository {
    /// Insert a freshly issued token for `user_id`.
    pub async fn store(
        pool: &DbPool,
        user_id: i64,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO user_tokens (user_id, token, expires_at, revoked, created_at) VALUES (?, ?, ?, 0, ?)",
        )
        .bind(user_id)
        .bind(token)
        .bind(expires_at)
        .bind(Utc::now())
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Look up a token row regardless of its state.
    pub async fn find(pool: &DbPool, token: &str) -> Result<Option<UserToken>, sqlx::Error> {
        query_as::<_, UserToken>("SELECT * FROM user_tokens WHERE token = ?")
            .bind(token)
            .fetch_optional(pool)
            .await
    }

    /// Owner of `token` if it is neither revoked nor expired at `now`.
    pub async fn find_valid_user_id(
        pool: &DbPool,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<i64>, sqlx::Error> {
        let row = Self::find(pool, token).await?;
        Ok(row.filter(|t| t.is_valid_at(now)).map(|t| t.user_id))
    }

    /// Existence and validity check, no side effects.
    pub async fn is_valid(pool: &DbPool, token: &str) -> Result<bool, sqlx::Error> {
        Ok(Self::find_valid_user_id(pool, token, Utc::now()).await?.is_some())
    }

    /// Mark a token revoked. Unknown tokens are not an error.
    pub async fn revoke(pool: &DbPool, token: &str) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE user_tokens SET revoked = 1 WHERE token = ?")
            .bind(token)
            .execute(pool)
            .await?;
        Ok(())
    }
}
