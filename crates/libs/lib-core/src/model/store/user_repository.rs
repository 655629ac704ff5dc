//! # User Repository
//!
//! Provides database access layer for the credential store.
//!
//! ## Example
//!
//! ```rust,no_run
//! # use lib_core::model::store::{create_pool, init_schema, UserRepository};
//! # async fn example() -> anyhow::Result<()> {
//! let pool = create_pool("sqlite::memory:", std::time::Duration::from_secs(5)).await?;
//! init_schema(&pool).await?;
//!
//! let user = UserRepository::create(&pool, "alice", "alice@example.com", "hashed_password").await?;
//!
//! let found = UserRepository::find_by_username(&pool, "alice").await?;
//! assert_eq!(found.map(|u| u.id), Some(user.id));
//! # Ok(())
//! # }
//! ```

use super::models::{User, UserForCreate};
use super::DbPool;
use chrono::Utc;
use sqlx::query_as;

/// User repository for database operations.
///
/// Users are created at registration and never updated here.
pub struct UserRepository;

impl UserRepository {
    /// Find a user by their email address.
    pub async fn find_by_email(pool: &DbPool, email: &str) -> Result<Option<User>, sqlx::Error> {
        query_as::<_, User>("SELECT * FROM users WHERE email = ?")
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by their username.
    ///
    /// # Returns
    ///
    /// * `Ok(Some(User))` - User found with matching username
    /// * `Ok(None)` - No user found with that username
    /// * `Err(sqlx::Error)` - Database error occurred
    pub async fn find_by_username(pool: &DbPool, username: &str) -> Result<Option<User>, sqlx::Error> {
        query_as::<_, User>("SELECT * FROM users WHERE username = ?")
            .bind(username)
            .fetch_optional(pool)
            .await
    }

    /// Fetch a user by primary key. `RowNotFound` if the row is gone.
    pub async fn get_by_id(pool: &DbPool, id: i64) -> Result<User, sqlx::Error> {
        query_as::<_, User>("SELECT * FROM users WHERE id = ?")
            .bind(id)
            .fetch_one(pool)
            .await
    }

    /// Create a new user using `UserForCreate`.
    pub async fn create_with(pool: &DbPool, user_data: UserForCreate) -> Result<User, sqlx::Error> {
        Self::create(pool, &user_data.username, &user_data.email, &user_data.password_hash).await
    }

    /// Create a new user in the database.
    ///
    /// `password_hash` must already be hashed (see `lib_auth::hash_password`).
    ///
    /// # Errors
    ///
    /// Returns `sqlx::Error` if:
    /// - Username already exists (UNIQUE constraint violation)
    /// - Email already exists (UNIQUE constraint violation)
    /// - Database connection fails
    pub async fn create(
        pool: &DbPool,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<User, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO users (username, email, password_hash, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(username)
        .bind(email)
        .bind(password_hash)
        .bind(Utc::now())
        .execute(pool)
        .await?;

        Self::get_by_id(pool, result.last_insert_rowid()).await
    }
}
