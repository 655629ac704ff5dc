use lib_core::AppError;
use thiserror::Error;

pub type Result<T> = core::result::Result<T, GatewayError>;

/// Failure of a single completion call. Never fatal to the process.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Transport failure, including connect and request timeouts.
    #[error("network error: {0}")]
    Network(String),

    #[error("failed to encode request: {0}")]
    Marshal(String),

    #[error("failed to decode response: {0}")]
    Decode(String),

    /// Provider answered 2xx with zero choices.
    #[error("provider returned no choices")]
    EmptyResponse,

    /// Provider answered with a non-success status.
    #[error("provider returned {status}: {body}")]
    Status { status: u16, body: String },
}

impl From<GatewayError> for AppError {
    fn from(err: GatewayError) -> Self {
        AppError::Gateway(err.to_string())
    }
}
