//! # Chat Data Transfer Objects
//!
//! `POST /` takes a [`ChatRequest`] and answers with a [`ChatResponse`];
//! `GET /conversation` returns a [`ConversationResponse`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::store::models::Message;

/// Inbound chat message. `message` is required.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

/// The assistant's reply.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    pub message: String,
}

/// One stored message as exposed to the owner of the conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageInfo {
    pub id: i64,
    pub message: String,
    pub is_user_message: bool,
    pub created_at: DateTime<Utc>,
}

impl From<Message> for MessageInfo {
    fn from(msg: Message) -> Self {
        Self {
            id: msg.id,
            message: msg.message,
            is_user_message: msg.is_user_message,
            created_at: msg.created_at,
        }
    }
}

/// The caller's conversation; `conversation_id` is `None` before the first message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationResponse {
    pub conversation_id: Option<i64>,
    pub messages: Vec<MessageInfo>,
}
