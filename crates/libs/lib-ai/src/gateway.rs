use async_trait::async_trait;

use crate::Result;

/// Sends one user message (with the fixed system prompt) to a model and
/// returns the reply text.
///
/// Object safe, so the web layer holds an `Arc<dyn CompletionGateway>` and
/// tests can swap in a stub.
#[async_trait]
pub trait CompletionGateway: Send + Sync {
    async fn complete(&self, user_message: &str) -> Result<String>;
}
