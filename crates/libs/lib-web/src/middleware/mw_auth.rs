//! # Authentication Middleware
//!
//! Axum middleware gating protected routes behind `Authorization: Bearer <token>`.
//!
//! The token must carry a valid signature and unexpired `exp`, and must also be
//! present in the token store, not revoked, and unexpired there. On success the
//! owning user is injected as [`CurrentUser`] and the raw token as [`BearerToken`].
//!
//! ```rust,ignore
//! use axum::extract::Extension;
//! use lib_web::middleware::CurrentUser;
//!
//! async fn protected_handler(Extension(CurrentUser(user)): Extension<CurrentUser>) -> String {
//!     format!("Hello, {}!", user.username)
//! }
//! ```

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};
use lib_auth::decode_token;
use lib_core::{model::store::models::User, AppError};
use tracing::{debug, error, warn};

use crate::server::AppState;
use crate::services::AuthService;

/// The authenticated caller.
#[derive(Clone, Debug)]
pub struct CurrentUser(pub User);

/// The bearer token the caller authenticated with.
#[derive(Clone, Debug)]
pub struct BearerToken(pub String);

/// Extract `<token>` from `Authorization: Bearer <token>`.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AppError> {
    let auth_header = headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| {
            warn!("[AUTH] Missing Authorization header");
            AppError::Unauthorized("missing authorization header".to_string())
        })?;

    auth_header
        .strip_prefix("Bearer ")
        .filter(|token| !token.is_empty())
        .ok_or_else(|| {
            warn!("[AUTH] Invalid Authorization header format");
            AppError::Unauthorized("authorization header must be 'Bearer <token>'".to_string())
        })
}

/// Authentication middleware, installed with `from_fn_with_state`.
///
/// Any failure short-circuits with `401` and a JSON error body; the handler is
/// not reached.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(req.headers())?.to_string();

    let claims = decode_token(&token, &state.config.jwt_secret).map_err(|e| {
        warn!("[AUTH] Token validation failed: {}", e);
        AppError::Unauthorized("invalid or expired token".to_string())
    })?;

    let auth = AuthService::new(state.db.clone(), state.config.clone());
    let user = auth.get_user_by_token(&token).await.map_err(|e| {
        match &e {
            AppError::Store(_) => error!("[AUTH] Token lookup failed: {}", e),
            _ => warn!("[AUTH] Token rejected: {}", e),
        }
        AppError::Unauthorized("invalid or expired token".to_string())
    })?;

    if user.username != claims.sub {
        warn!("[AUTH] Token subject does not match stored owner");
        return Err(AppError::Unauthorized("invalid or expired token".to_string()));
    }

    debug!("[AUTH] Authenticated user: {} (id: {})", user.username, user.id);

    req.extensions_mut().insert(CurrentUser(user));
    req.extensions_mut().insert(BearerToken(token));

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_bearer_token_extracted() {
        assert_eq!(bearer_token(&headers("Bearer abc.def")).unwrap(), "abc.def");
    }

    #[test]
    fn test_bearer_token_rejects_other_schemes() {
        assert!(bearer_token(&headers("Basic xyz")).is_err());
        assert!(bearer_token(&headers("bearer abc")).is_err());
        assert!(bearer_token(&headers("Bearer ")).is_err());
        assert!(bearer_token(&HeaderMap::new()).is_err());
    }
}
