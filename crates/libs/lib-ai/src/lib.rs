//! # Completion Gateway
//!
//! Boundary to the external language-model provider. Handlers depend on the
//! [`CompletionGateway`] trait; [`OpenAiGateway`] is the production implementation.

// region: --- Modules
pub mod error;
pub mod gateway;
pub mod openai;
// endregion: --- Modules

// region: --- Re-exports
pub use error::{GatewayError, Result};
pub use gateway::CompletionGateway;
pub use openai::{OpenAiGateway, SYSTEM_PROMPT};
// endregion: --- Re-exports
