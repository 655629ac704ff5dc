//! # Data Transfer Objects (DTOs)
//!
//! Request and response bodies exchanged with clients over the REST API.

pub mod auth;
pub mod chat;

pub use auth::*;
pub use chat::*;
