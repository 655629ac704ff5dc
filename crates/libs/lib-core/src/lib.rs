//! # Core Library
//!
//! Configuration, error type, DTOs, and the SQL store (users, tokens,
//! conversations, messages).

pub mod config;
pub mod error;
pub mod model;
pub mod dto;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, Result};
pub use model::store::{create_pool, init_schema, DbPool};
