//! # Chat Service
//!
//! One chat turn: make sure the caller has a conversation, ask the completion
//! gateway, then append the user message and the reply.
//!
//! ```text
//! ChatService → ConversationRepository (ensure)
//!             → CompletionGateway      (external model)
//!             → ConversationRepository (persist turn)
//! ```
//!
//! Nothing is written when the gateway fails, so the log never holds a user
//! message without its reply.

use std::sync::Arc;

use lib_ai::CompletionGateway;
use lib_core::{
    dto::{ConversationResponse, MessageInfo},
    model::store::ConversationRepository,
    AppError, DbPool, Result,
};
use tracing::{debug, error, info, instrument};

#[derive(Clone)]
pub struct ChatService {
    db: DbPool,
    gateway: Arc<dyn CompletionGateway>,
}

impl ChatService {
    pub fn new(db: DbPool, gateway: Arc<dyn CompletionGateway>) -> Self {
        Self { db, gateway }
    }

    /// Run one turn for `user_id` and return the assistant reply.
    #[instrument(skip(self, message), fields(len = message.len()))]
    pub async fn send_message(&self, user_id: i64, message: &str) -> Result<String> {
        let conversation = ConversationRepository::create_if_not_exists(&self.db, user_id).await?;
        debug!("[CHAT] Conversation {} for user {}", conversation.id, user_id);

        let reply = self.gateway.complete(message).await.map_err(|e| {
            error!("[CHAT] Completion failed for user {}: {}", user_id, e);
            AppError::from(e)
        })?;

        ConversationRepository::add_message(&self.db, conversation.id, message, true).await?;
        ConversationRepository::add_message(&self.db, conversation.id, &reply, false).await?;

        info!("[CHAT] Turn stored in conversation {}", conversation.id);
        Ok(reply)
    }

    /// The caller's messages; empty before the first turn.
    #[instrument(skip(self))]
    pub async fn conversation(&self, user_id: i64) -> Result<ConversationResponse> {
        let Some(conversation) = ConversationRepository::find_by_user(&self.db, user_id).await? else {
            return Ok(ConversationResponse {
                conversation_id: None,
                messages: Vec::new(),
            });
        };

        let messages = ConversationRepository::get_all_messages(&self.db, conversation.id)
            .await?
            .into_iter()
            .map(MessageInfo::from)
            .collect();

        Ok(ConversationResponse {
            conversation_id: Some(conversation.id),
            messages,
        })
    }

    /// Plain-text transcript; empty before the first turn.
    #[instrument(skip(self))]
    pub async fn transcript(&self, user_id: i64) -> Result<String> {
        match ConversationRepository::find_by_user(&self.db, user_id).await? {
            Some(conversation) => Ok(ConversationRepository::get_as_string(&self.db, conversation.id).await?),
            None => Ok(String::new()),
        }
    }
}
