//! # Auth Handler Tests
//!
//! Test suite for the session endpoints, driven through the full router.


use crate::test_support::*;
use axum::http::StatusCode;
use std::sync::Arc;
use tower::ServiceExt;

/// Router over a fresh database; the gateway is never called by these routes.
pub async fn auth_app() -> (axum::Router, crate::AppState) {
    let pool = setup_test_db().await;
    let state = test_state(pool, Arc::new(StubGateway::reply("unused")));
    (test_app(state.clone()), state)
}

pub async fn register_user(app: &axum::Router, username: &str, password: &str) -> StatusCode {
    let body = serde_json::json!({
        "username": username,
        "email": format!("{}@example.com", username),
        "password": password,
    });
    app.clone()
        .oneshot(json_request("POST", "/auth/register", None, &body.to_string()))
        .await
        .unwrap()
        .status()
}
