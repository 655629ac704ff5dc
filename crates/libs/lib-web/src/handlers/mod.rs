//! # HTTP Request Handlers
//!
//! Axum handlers organized by feature. Handlers only extract, validate, and
//! delegate to [`crate::services`]; errors are `AppError` and become JSON
//! bodies via its `IntoResponse`.
//!
//! ## Handler Modules
//!
//! - **[`chat`]**: `POST /` - one chat turn (protected)
//! - **[`conversation`]**: `GET /conversation`, `GET /conversation/transcript` (protected)
//! - **[`auth`]**: register, login, logout, token validation
//! - **[`health`]**: `GET /health`
//!
//! ## Request Bodies
//!
//! JSON bodies are taken as `Result<Json<T>, JsonRejection>` so that every
//! malformed body (bad JSON, missing field, wrong content type) is a `400`
//! with the usual `{"error", "code"}` shape instead of axum's plain-text 415/422.

use axum::{extract::rejection::JsonRejection, Json};
use lib_core::AppError;
use tracing::warn;

pub mod auth;
pub mod chat;
pub mod conversation;
pub mod health;

/// Unwrap a JSON body or turn the rejection into `InvalidInput`.
pub(crate) fn parse_json<T>(payload: Result<Json<T>, JsonRejection>) -> lib_core::Result<T> {
    match payload {
        Ok(Json(value)) => Ok(value),
        Err(rejection) => {
            warn!("[REQUEST] Rejected body: {}", rejection.body_text());
            Err(AppError::InvalidInput(rejection.body_text()))
        }
    }
}
