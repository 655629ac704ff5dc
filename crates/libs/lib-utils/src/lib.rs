//! # Utilities Library
//!
//! Shared helpers for environment variables, timestamps, and input validation.

pub mod envs;
pub mod time;
pub mod validation;

// Re-export commonly used functions
pub use envs::{get_env_or, get_env_parse_or};
pub use time::now_utc;
pub use validation::{validate_email, validate_length_range, validate_min_length, validate_not_empty};
