//! # Services Layer
//!
//! Business logic between the HTTP handlers and the store / completion gateway.
//!
//! ```text
//! Handlers (HTTP) → Services (Business Logic) → Repositories / CompletionGateway
//! ```
//!
//! Services are cheap to clone and are pulled out of `AppState` with
//! `State<AuthService>` / `State<ChatService>`. All methods return
//! `Result<T, AppError>`; status codes are chosen only at the HTTP boundary.

pub mod auth;
pub mod chat;

pub use auth::AuthService;
pub use chat::ChatService;
