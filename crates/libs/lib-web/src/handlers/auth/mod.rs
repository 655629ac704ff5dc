//! # Authentication Handlers
//!
//! HTTP request handlers for the session endpoints.
//!
//! - `POST /auth/register` - create a user
//! - `POST /auth/login` - exchange username/password for a bearer token
//! - `POST /auth/logout` - revoke the presented bearer token (protected)
//! - `GET /auth/validate?token=...` - report whether a token is currently valid

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Extension, Json, Query, State,
    },
    http::StatusCode,
};
use lib_core::{
    dto::{
        LoginRequest, LoginResponse, MessageResponse, RegisterRequest, UserInfo, ValidateTokenQuery,
        ValidateTokenResponse,
    },
    AppError, Result,
};
use tracing::{info, instrument};

use super::parse_json;
use crate::middleware::{BearerToken, CurrentUser};
use crate::services::AuthService;

/// Register handler - creates a new user account.
///
/// # Returns
///
/// * `201` with the public [`UserInfo`]
/// * `400` on malformed body or failed validation
/// * `409` when the username or email is taken
#[instrument(skip_all)]
pub async fn register(
    State(auth): State<AuthService>,
    payload: std::result::Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<UserInfo>)> {
    let req = parse_json(payload)?;
    info!("[SIGNUP] New user signup request: {}", req.username);

    let user = auth.register(&req).await?;

    Ok((StatusCode::CREATED, Json(UserInfo::from(&user))))
}

/// Login handler - authenticates an existing user and issues a token.
#[instrument(skip_all)]
pub async fn login(
    State(auth): State<AuthService>,
    payload: std::result::Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>> {
    let req = parse_json(payload)?;
    Ok(Json(auth.login(&req.username, &req.password).await?))
}

/// Logout handler - revokes the token the request was authenticated with.
#[instrument(skip_all, fields(user_id = user.id))]
pub async fn logout(
    State(auth): State<AuthService>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Extension(BearerToken(token)): Extension<BearerToken>,
) -> Result<Json<MessageResponse>> {
    auth.revoke_token(&token).await?;
    info!("[AUTH] User {} logged out", user.username);

    Ok(Json(MessageResponse {
        message: "Logged out".to_string(),
    }))
}

/// Token validation handler. Never fails on an unknown token, only reports it.
#[instrument(skip_all)]
pub async fn validate(
    State(auth): State<AuthService>,
    query: std::result::Result<Query<ValidateTokenQuery>, QueryRejection>,
) -> Result<Json<ValidateTokenResponse>> {
    let Query(query) = query.map_err(|rejection| AppError::InvalidInput(rejection.body_text()))?;

    let valid = auth.validate_token(&query.token).await?;

    Ok(Json(ValidateTokenResponse { valid }))
}

#[cfg(test)]
mod tests;
