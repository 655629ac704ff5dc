//! # OpenAI-compatible Chat Completions Client
//!
//! `POST {base_url}/chat/completions` with a bearer key. Only the first
//! choice's content is used.

use std::time::Duration;

use async_trait::async_trait;
use lib_core::Config;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::{CompletionGateway, GatewayError, Result};

/// Prompt sent as the `system` message of every request.
pub const SYSTEM_PROMPT: &str = "you are ai assistant";

const CONNECT_TIMEOUT_SECS: u64 = 10;

// region: --- Wire types

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    temperature: f32,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

// endregion: --- Wire types

/// Production gateway backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct OpenAiGateway {
    http: Client,
    api_key: String,
    endpoint: String,
    model: String,
    temperature: f32,
}

impl OpenAiGateway {
    /// Build a gateway with an explicit whole-request timeout.
    pub fn new(
        api_key: impl Into<String>,
        base_url: &str,
        model: impl Into<String>,
        temperature: f32,
        timeout: Duration,
    ) -> Result<Self> {
        let http = Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .timeout(timeout)
            .build()
            .map_err(|e| GatewayError::Network(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            api_key: api_key.into(),
            endpoint: format!("{}/chat/completions", base_url.trim_end_matches('/')),
            model: model.into(),
            temperature,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(
            config.openai_api_key.clone(),
            &config.openai_base_url,
            config.openai_model.clone(),
            config.openai_temperature,
            Duration::from_secs(config.ai_timeout_secs),
        )
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn build_body(&self, user_message: &str) -> Result<Vec<u8>> {
        let request = ChatCompletionRequest {
            model: &self.model,
            temperature: self.temperature,
            messages: vec![
                ChatMessage { role: "system", content: SYSTEM_PROMPT },
                ChatMessage { role: "user", content: user_message },
            ],
        };
        serde_json::to_vec(&request).map_err(|e| GatewayError::Marshal(e.to_string()))
    }
}

/// Pull `choices[0].message.content` out of a raw provider body.
fn extract_reply(body: &str) -> Result<String> {
    let parsed: ChatCompletionResponse =
        serde_json::from_str(body).map_err(|e| GatewayError::Decode(e.to_string()))?;

    let choice = parsed
        .choices
        .into_iter()
        .next()
        .ok_or(GatewayError::EmptyResponse)?;

    choice
        .message
        .content
        .ok_or_else(|| GatewayError::Decode("first choice has no content".to_string()))
}

#[async_trait]
impl CompletionGateway for OpenAiGateway {
    async fn complete(&self, user_message: &str) -> Result<String> {
        let body = self.build_body(user_message)?;

        debug!("[AI] POST {} (model={})", self.endpoint, self.model);

        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| {
                error!("[AI] Request to provider failed: {}", e);
                GatewayError::Network(e.to_string())
            })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| GatewayError::Network(format!("failed to read response: {}", e)))?;

        if !status.is_success() {
            error!("[AI] Provider returned {}", status);
            return Err(GatewayError::Status {
                status: status.as_u16(),
                body: text.chars().take(500).collect(),
            });
        }

        let reply = extract_reply(&text)?;
        info!("[AI] Completion received ({} chars)", reply.len());
        Ok(reply)
    }
}
