//! # Application Configuration
//!
//! This module manages application configuration loaded from environment variables.
//! All configuration is validated on startup to fail fast if misconfigured.
//!
//! The loaded [`Config`] is handed to the server at startup and travels inside
//! the application state; nothing reads it from a global.
//!
//! ```rust,no_run
//! use lib_core::Config;
//!
//! let config = Config::load().expect("invalid configuration");
//! let db_url = &config.database_url;
//! ```

use std::env;

use lib_utils::{get_env_or, get_env_parse_or};

/// Default completion model, matches the provider's small chat model.
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_OPENAI_TEMPERATURE: f32 = 0.4;

/// Application configuration loaded from environment variables.
#[derive(Clone, Debug)]
pub struct Config {
    /// SQLite database connection URL
    pub database_url: String,

    /// Secret key for session token signing and verification
    ///
    /// **Must be at least 32 characters long** for security.
    pub jwt_secret: String,

    /// Session token validity period in hours
    ///
    /// Valid range: 1-720 hours (1 hour to 30 days)
    pub token_ttl_hours: i64,

    /// API key sent as `Authorization: Bearer` to the completion provider
    pub openai_api_key: String,

    /// Provider base URL; `/chat/completions` is appended
    pub openai_base_url: String,

    pub openai_model: String,

    pub openai_temperature: f32,

    /// Whole-request timeout for the outbound completion call
    pub ai_timeout_secs: u64,

    /// Upper bound on waiting for a pooled database connection and on a
    /// statement blocked by a locked database
    pub db_acquire_timeout_secs: u64,
}

impl Config {
    /// Load `.env` (if present), read the environment, and validate.
    pub fn load() -> Result<Self, String> {
        dotenvy::dotenv().ok();
        let config = Self::from_env()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, String> {
        let database_url = get_env_or("DATABASE_URL", "sqlite:data/chat.db");

        let jwt_secret = env::var("JWT_SECRET")
            .map_err(|_| "JWT_SECRET must be set in environment")?;

        let token_ttl_hours = get_env_parse_or("TOKEN_TTL_HOURS", 1_i64)
            .map_err(|e| format!("TOKEN_TTL_HOURS must be a valid number: {}", e))?;

        // `gpt_token` is the variable name older deployments used.
        let openai_api_key = env::var("OPENAI_API_KEY")
            .or_else(|_| env::var("gpt_token"))
            .map_err(|_| "OPENAI_API_KEY must be set in environment")?;

        let openai_base_url = get_env_or("OPENAI_BASE_URL", DEFAULT_OPENAI_BASE_URL);
        let openai_model = get_env_or("OPENAI_MODEL", DEFAULT_OPENAI_MODEL);

        let openai_temperature = get_env_parse_or("OPENAI_TEMPERATURE", DEFAULT_OPENAI_TEMPERATURE)
            .map_err(|e| format!("OPENAI_TEMPERATURE must be a valid number: {}", e))?;

        let ai_timeout_secs = get_env_parse_or("AI_TIMEOUT_SECS", 30_u64)
            .map_err(|e| format!("AI_TIMEOUT_SECS must be a valid number: {}", e))?;

        let db_acquire_timeout_secs = get_env_parse_or("DB_ACQUIRE_TIMEOUT_SECS", 5_u64)
            .map_err(|e| format!("DB_ACQUIRE_TIMEOUT_SECS must be a valid number: {}", e))?;

        Ok(Self {
            database_url,
            jwt_secret,
            token_ttl_hours,
            openai_api_key,
            openai_base_url,
            openai_model,
            openai_temperature,
            ai_timeout_secs,
            db_acquire_timeout_secs,
        })
    }

    /// Validate configuration values against security and business rules.
    pub fn validate(&self) -> Result<(), String> {
        if self.jwt_secret.len() < 32 {
            return Err("JWT_SECRET must be at least 32 characters long".to_string());
        }

        if self.token_ttl_hours < 1 || self.token_ttl_hours > 720 {
            return Err("TOKEN_TTL_HOURS must be between 1 and 720 (30 days)".to_string());
        }

        if self.openai_api_key.trim().is_empty() {
            return Err("OPENAI_API_KEY cannot be empty".to_string());
        }

        if !(0.0..=2.0).contains(&self.openai_temperature) {
            return Err("OPENAI_TEMPERATURE must be between 0.0 and 2.0".to_string());
        }

        if self.ai_timeout_secs == 0 || self.db_acquire_timeout_secs == 0 {
            return Err("Timeouts must be at least 1 second".to_string());
        }

        Ok(())
    }

    /// Session token lifetime as a chrono duration.
    pub fn token_ttl(&self) -> chrono::Duration {
        chrono::Duration::hours(self.token_ttl_hours)
    }
}
