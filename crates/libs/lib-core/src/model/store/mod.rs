//! # Database Store
//!
//! Database connection pool, schema bootstrap, and repository implementations.

// region: --- Modules
pub mod models;
pub mod schema;
pub mod user_repository;
pub mod token_repository;
pub mod conversation_repository;
// endregion: --- Modules

// region: --- Re-exports
pub use conversation_repository::{render_transcript, ConversationRepository};
pub use schema::init_schema;
pub use token_repository::TokenRepository;
pub use user_repository::UserRepository;
// endregion: --- Re-exports

// region: --- Types and Functions
use std::time::Duration;

use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    SqlitePool,
};

/// Type alias for SQLite connection pool.
pub type DbPool = SqlitePool;

/// Create a new SQLite connection pool.
///
/// The database file is created when missing and foreign keys are enforced
/// on every connection so the `ON DELETE CASCADE` rules hold.
///
/// `timeout` bounds both waiting for a pooled connection and waiting on a
/// locked database inside a statement.
pub async fn create_pool(database_url: &str, timeout: Duration) -> anyhow::Result<DbPool> {
    let options = database_url
        .parse::<SqliteConnectOptions>()?
        .create_if_missing(true)
        .foreign_keys(true)
        .busy_timeout(timeout);

    let pool = SqlitePoolOptions::new()
        .acquire_timeout(timeout)
        .connect_with(options)
        .await?;

    Ok(pool)
}
// endregion: --- Types and Functions

// region: --- Test helpers
/// Single-connection in-memory database with the production schema.
///
/// One connection only: every `sqlite::memory:` connection is its own database.
#[cfg(test)]
pub(crate) async fn setup_test_db() -> DbPool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to create test database");

    init_schema(&pool)
        .await
        .expect("Failed to create schema");

    pool
}
// endregion: --- Test helpers
