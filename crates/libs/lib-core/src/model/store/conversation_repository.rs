//! # Conversation Repository
//!
//! One conversation per user (enforced by `UNIQUE(user_id)`) and its
//! append-only message log.

use std::fmt::Write as _;

use super::models::{Conversation, Message};
use super::DbPool;
use chrono::Utc;
use sqlx::query_as;
use tracing::debug;

pub struct ConversationRepository;

impl ConversationRepository {
    /// Return the user's conversation, creating it on first use.
    ///
    /// The insert is a no-op when the row already exists, so concurrent callers
    /// for the same user all end up with the same id.
    pub async fn create_if_not_exists(pool: &DbPool, user_id: i64) -> Result<Conversation, sqlx::Error> {
        let inserted = sqlx::query(
            "INSERT INTO conversations (user_id, created_at) VALUES (?, ?) ON CONFLICT(user_id) DO NOTHING",
        )
        .bind(user_id)
        .bind(Utc::now())
        .execute(pool)
        .await?;

        if inserted.rows_affected() > 0 {
            debug!("[DB] Created conversation for user {}", user_id);
        }

        Self::get_by_user(pool, user_id).await
    }

    /// `RowNotFound` if the user has never chatted.
    pub async fn get_by_user(pool: &DbPool, user_id: i64) -> Result<Conversation, sqlx::Error> {
        query_as::<_, Conversation>("SELECT * FROM conversations WHERE user_id = ?")
            .bind(user_id)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_user(pool: &DbPool, user_id: i64) -> Result<Option<Conversation>, sqlx::Error> {
        query_as::<_, Conversation>("SELECT * FROM conversations WHERE user_id = ?")
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Append one message with a server-assigned timestamp.
    pub async fn add_message(
        pool: &DbPool,
        conversation_id: i64,
        text: &str,
        is_user_message: bool,
    ) -> Result<Message, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO messages (conversation_id, message, is_user_message, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(conversation_id)
        .bind(text)
        .bind(is_user_message)
        .bind(Utc::now())
        .execute(pool)
        .await?;

        query_as::<_, Message>("SELECT * FROM messages WHERE id = ?")
            .bind(result.last_insert_rowid())
            .fetch_one(pool)
            .await
    }

    /// All messages in chronological order; `id` breaks timestamp ties.
    pub async fn get_all_messages(pool: &DbPool, conversation_id: i64) -> Result<Vec<Message>, sqlx::Error> {
        query_as::<_, Message>(
            "SELECT * FROM messages WHERE conversation_id = ? ORDER BY created_at ASC, id ASC",
        )
        .bind(conversation_id)
        .fetch_all(pool)
        .await
    }

    /// Plain-text transcript, see [`render_transcript`].
    pub async fn get_as_string(pool: &DbPool, conversation_id: i64) -> Result<String, sqlx::Error> {
        let messages = Self::get_all_messages(pool, conversation_id).await?;
        Ok(render_transcript(&messages))
    }
}

/// One `user: <text>` or `ai: <text>` line per message, each newline-terminated.
pub fn render_transcript(messages: &[Message]) -> String {
    let mut out = String::new();
    for m in messages {
        let speaker = if m.is_user_message { "user" } else { "ai" };
        // Writing into a String cannot fail.
        let _ = writeln!(out, "{}: {}", speaker, m.message);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::store::{setup_test_db, UserRepository};

    async fn seed_user(pool: &DbPool, name: &str) -> i64 {
        UserRepository::create(pool, name, &format!("{}@example.com", name), "h")
            .await
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn test_create_if_not_exists_is_idempotent() {
        let pool = setup_test_db().await;
        let user_id = seed_user(&pool, "alice").await;

        let first = ConversationRepository::create_if_not_exists(&pool, user_id).await.unwrap();
        let second = ConversationRepository::create_if_not_exists(&pool, user_id).await.unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(first.user_id, user_id);
    }

    #[tokio::test]
    async fn test_concurrent_create_yields_one_row() {
        let pool = setup_test_db().await;
        let user_id = seed_user(&pool, "alice").await;

        let (a, b, c) = tokio::join!(
            ConversationRepository::create_if_not_exists(&pool, user_id),
            ConversationRepository::create_if_not_exists(&pool, user_id),
            ConversationRepository::create_if_not_exists(&pool, user_id),
        );

        let ids = [a.unwrap().id, b.unwrap().id, c.unwrap().id];
        assert!(ids.iter().all(|id| *id == ids[0]));

        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM conversations WHERE user_id = ?")
            .bind(user_id)
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn test_get_by_user_missing_is_not_found() {
        let pool = setup_test_db().await;
        let user_id = seed_user(&pool, "alice").await;

        let err = ConversationRepository::get_by_user(&pool, user_id).await.unwrap_err();
        let app_err: crate::AppError = err.into();
        assert!(matches!(app_err, crate::AppError::NotFound(_)));

        assert!(ConversationRepository::find_by_user(&pool, user_id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_messages_grow_in_order() {
        let pool = setup_test_db().await;
        let user_id = seed_user(&pool, "alice").await;
        let conv = ConversationRepository::create_if_not_exists(&pool, user_id).await.unwrap();

        assert!(ConversationRepository::get_all_messages(&pool, conv.id).await.unwrap().is_empty());

        for (i, text) in ["one", "two", "three", "four"].iter().enumerate() {
            ConversationRepository::add_message(&pool, conv.id, text, i % 2 == 0)
                .await
                .unwrap();
            let all = ConversationRepository::get_all_messages(&pool, conv.id).await.unwrap();
            assert_eq!(all.len(), i + 1);
        }

        let all = ConversationRepository::get_all_messages(&pool, conv.id).await.unwrap();
        assert!(all.windows(2).all(|w| w[0].created_at <= w[1].created_at));
        let texts: Vec<&str> = all.iter().map(|m| m.message.as_str()).collect();
        assert_eq!(texts, vec!["one", "two", "three", "four"]);
    }

    #[tokio::test]
    async fn test_transcript_format() {
        let pool = setup_test_db().await;
        let user_id = seed_user(&pool, "alice").await;
        let conv = ConversationRepository::create_if_not_exists(&pool, user_id).await.unwrap();

        ConversationRepository::add_message(&pool, conv.id, "hi", true).await.unwrap();
        ConversationRepository::add_message(&pool, conv.id, "hello!", false).await.unwrap();

        let transcript = ConversationRepository::get_as_string(&pool, conv.id).await.unwrap();
        assert_eq!(transcript, "user: hi\nai: hello!\n");
    }

    #[test]
    fn test_render_empty_transcript() {
        assert_eq!(render_transcript(&[]), "");
    }

    #[tokio::test]
    async fn test_deleting_user_cascades() {
        let pool = setup_test_db().await;
        let user_id = seed_user(&pool, "alice").await;
        let conv = ConversationRepository::create_if_not_exists(&pool, user_id).await.unwrap();
        ConversationRepository::add_message(&pool, conv.id, "hi", true).await.unwrap();

        sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(user_id)
            .execute(&pool)
            .await
            .unwrap();

        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM messages")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 0);
    }
}
