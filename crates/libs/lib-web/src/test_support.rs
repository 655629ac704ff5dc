//! Shared fixtures for the handler and service tests.

use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{body::Body, http::Request, Router};
use lib_ai::{CompletionGateway, GatewayError};
use lib_core::{init_schema, Config, DbPool};
use sqlx::sqlite::SqlitePoolOptions;

use crate::server::{create_router, AppState};
use crate::services::AuthService;

pub const TEST_PASSWORD: &str = "TestPassword123!";

/// In-memory database with the production schema; one connection so every
/// query sees the same database.
pub async fn setup_test_db() -> DbPool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to create test database");

    init_schema(&pool).await.expect("Failed to create schema");
    pool
}

pub fn test_config() -> Config {
    Config {
        database_url: "sqlite::memory:".to_string(),
        jwt_secret: "test-secret-key-must-be-at-least-32-characters-long!".to_string(),
        token_ttl_hours: 1,
        openai_api_key: "sk-test".to_string(),
        openai_base_url: "http://127.0.0.1:1".to_string(),
        openai_model: "gpt-4o-mini".to_string(),
        openai_temperature: 0.4,
        ai_timeout_secs: 5,
        db_acquire_timeout_secs: 5,
    }
}

/// Canned completion gateway.
pub struct StubGateway {
    reply: Option<String>,
    pub calls: AtomicUsize,
}

impl StubGateway {
    pub fn reply(text: &str) -> Self {
        Self {
            reply: Some(text.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            reply: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CompletionGateway for StubGateway {
    async fn complete(&self, _user_message: &str) -> Result<String, GatewayError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.reply {
            Some(text) => Ok(text.clone()),
            None => Err(GatewayError::Network("connection refused".to_string())),
        }
    }
}

pub fn test_state(pool: DbPool, gateway: Arc<dyn CompletionGateway>) -> AppState {
    AppState {
        db: pool,
        config: test_config(),
        gateway,
    }
}

/// The production router over `state`.
pub fn test_app(state: AppState) -> Router {
    create_router(state, &[])
}

/// Register `username` and log in, returning a bearer token.
pub async fn seed_user_with_token(state: &AppState, username: &str) -> String {
    let auth = AuthService::new(state.db.clone(), state.config.clone());
    auth.register(&lib_core::dto::RegisterRequest {
        username: username.to_string(),
        email: format!("{}@example.com", username),
        password: TEST_PASSWORD.to_string(),
    })
    .await
    .expect("register should succeed in test");

    auth.login(username, TEST_PASSWORD)
        .await
        .expect("login should succeed in test")
        .token
}

pub fn json_request(method: &str, uri: &str, token: Option<&str>, body: &str) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub fn get_request(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }
    builder.body(Body::empty()).unwrap()
}

pub async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Log sink shared between a fmt subscriber and the test reading it.
#[derive(Clone, Default)]
pub struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    /// Install a thread-local subscriber writing every level into the buffer.
    ///
    /// Hold the guard for the duration of the test; `#[tokio::test]` runs on
    /// the current thread so the request futures log through it.
    pub fn install(&self) -> tracing::subscriber::DefaultGuard {
        let sink = self.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::TRACE)
            .with_ansi(false)
            .with_writer(move || sink.clone())
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
