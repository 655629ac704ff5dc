//! # Conversation Handlers
//!
//! Read-only views of the caller's conversation.

use axum::{
    extract::{Extension, State},
    http::header::CONTENT_TYPE,
    response::IntoResponse,
    Json,
};
use lib_core::{dto::ConversationResponse, Result};
use tracing::instrument;

use crate::middleware::CurrentUser;
use crate::services::ChatService;

/// `GET /conversation` - messages in chronological order.
#[instrument(skip_all, fields(user_id = user.id))]
pub async fn get_conversation(
    State(chat): State<ChatService>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Result<Json<ConversationResponse>> {
    Ok(Json(chat.conversation(user.id).await?))
}

/// `GET /conversation/transcript` - `user: ...` / `ai: ...` lines as plain text.
#[instrument(skip_all, fields(user_id = user.id))]
pub async fn get_transcript(
    State(chat): State<ChatService>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Result<impl IntoResponse> {
    let transcript = chat.transcript(user.id).await?;
    Ok(([(CONTENT_TYPE, "text/plain; charset=utf-8")], transcript))
}
