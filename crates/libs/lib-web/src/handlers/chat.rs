//! # Chat Handler
//!
//! `POST /` with `{"message": "<text>"}` → `{"message": "<reply>"}`.

use axum::{
    extract::{rejection::JsonRejection, Extension, State},
    Json,
};
use lib_core::{
    dto::{ChatRequest, ChatResponse},
    AppError, Result,
};
use lib_utils::validate_not_empty;
use tracing::{info, instrument};

use super::parse_json;
use crate::middleware::CurrentUser;
use crate::services::ChatService;

/// Handle one chat turn for the authenticated caller.
///
/// - `400` on a malformed body or blank message
/// - `502` when the completion provider fails (nothing is stored)
/// - `500` on store failure
#[instrument(skip_all, fields(user_id = user.id))]
pub async fn handle_chat(
    State(chat): State<ChatService>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    payload: std::result::Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>> {
    let req = parse_json(payload)?;
    validate_not_empty(&req.message, "message").map_err(AppError::InvalidInput)?;

    info!("[CHAT] Message from {}", user.username);

    let reply = chat.send_message(user.id, &req.message).await?;

    Ok(Json(ChatResponse { message: reply }))
}
