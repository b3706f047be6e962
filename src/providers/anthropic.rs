//! Anthropic provider implementation for chatflow
//!
//! This module implements the Provider trait for the Anthropic Messages API.
//! Each `generate` call is a single non-streaming `POST /v1/messages`.

use crate::config::AnthropicConfig;
use crate::error::{ChatflowError, Result};
use crate::providers::{GenerationOptions, Message, Provider, TokenUsage};

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Anthropic Messages API provider
///
/// The API key is bound at construction time and sent as a default header,
/// so a provider instance is tied to exactly one credential.
///
/// # Examples
///
/// ```no_run
/// use chatflow::config::{AnthropicConfig, ModeConfig};
/// use chatflow::providers::{AnthropicProvider, Message, Provider};
///
/// # async fn example() -> chatflow::error::Result<()> {
/// let provider = AnthropicProvider::new(AnthropicConfig::default(), "sk-ant-...")?;
/// let options = ModeConfig::chat_defaults().generation_options();
/// let reply = provider.generate(&[Message::user("Hello!")], &options).await?;
/// # Ok(())
/// # }
/// ```
pub struct AnthropicProvider {
    client: Client,
    config: AnthropicConfig,
}

/// Request body for `POST /v1/messages`
#[derive(Debug, Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: &'a [Message],
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

/// Response body from `POST /v1/messages`
#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    #[serde(default)]
    content: Vec<AnthropicContentBlock>,
    #[serde(default)]
    usage: Option<AnthropicUsage>,
    #[serde(default)]
    stop_reason: Option<String>,
}

/// One block of response content; only `text` blocks are used
#[derive(Debug, Deserialize)]
struct AnthropicContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AnthropicUsage {
    #[serde(default)]
    input_tokens: usize,
    #[serde(default)]
    output_tokens: usize,
}

/// Error envelope returned with non-success statuses
#[derive(Debug, Deserialize)]
struct AnthropicErrorEnvelope {
    error: AnthropicErrorBody,
}

#[derive(Debug, Deserialize)]
struct AnthropicErrorBody {
    #[serde(default)]
    message: String,
}

impl AnthropicProvider {
    /// Create a new Anthropic provider bound to an API key
    ///
    /// # Arguments
    ///
    /// * `config` - Endpoint, API version, and timeout settings
    /// * `api_key` - Secret sent in the `x-api-key` header
    ///
    /// # Errors
    ///
    /// Returns a credential error if the key is empty or cannot be sent as a
    /// header value, or a remote error if the HTTP client cannot be built
    ///
    /// # Examples
    ///
    /// ```
    /// use chatflow::config::AnthropicConfig;
    /// use chatflow::providers::AnthropicProvider;
    ///
    /// assert!(AnthropicProvider::new(AnthropicConfig::default(), "sk-ant-test").is_ok());
    /// assert!(AnthropicProvider::new(AnthropicConfig::default(), "").is_err());
    /// ```
    pub fn new(config: AnthropicConfig, api_key: &str) -> Result<Self> {
        if api_key.trim().is_empty() {
            return Err(ChatflowError::Credential("API key cannot be empty".to_string()).into());
        }

        if api_key.chars().any(char::is_whitespace) {
            return Err(
                ChatflowError::Credential("API key must not contain whitespace".to_string()).into(),
            );
        }

        let mut key_header = HeaderValue::from_str(api_key).map_err(|_| {
            ChatflowError::Credential("API key contains invalid characters".to_string())
        })?;
        key_header.set_sensitive(true);

        let version_header = HeaderValue::from_str(&config.api_version).map_err(|_| {
            ChatflowError::Config(format!("Invalid anthropic-version: {}", config.api_version))
        })?;

        let mut headers = HeaderMap::new();
        headers.insert("x-api-key", key_header);
        headers.insert("anthropic-version", version_header);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent("chatflow/0.1.0")
            .default_headers(headers)
            .build()
            .map_err(|e| ChatflowError::Remote(format!("Failed to create HTTP client: {}", e)))?;

        tracing::info!(
            "Initialized Anthropic provider: api_base={}, version={}",
            config.api_base,
            config.api_version
        );

        Ok(Self { client, config })
    }

    fn messages_url(&self) -> String {
        format!("{}/v1/messages", self.config.api_base.trim_end_matches('/'))
    }
}

/// Map a non-success HTTP status to a remote error variant
fn classify_status(status: StatusCode, body: &str) -> ChatflowError {
    let detail = extract_error_message(body);
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            ChatflowError::Authentication(format!("Anthropic rejected the API key: {}", detail))
        }
        StatusCode::TOO_MANY_REQUESTS => ChatflowError::RateLimited(detail),
        _ => ChatflowError::Remote(format!("Anthropic returned error {}: {}", status, detail)),
    }
}

/// Pull the human-readable message out of an Anthropic error body
fn extract_error_message(body: &str) -> String {
    serde_json::from_str::<AnthropicErrorEnvelope>(body)
        .map(|envelope| envelope.error.message)
        .ok()
        .filter(|message| !message.is_empty())
        .unwrap_or_else(|| body.trim().to_string())
}

/// Concatenate the text blocks of a response
///
/// Returns `None` when there is no text or only whitespace, since an empty
/// assistant turn would be rejected on every later request.
fn extract_text(response: &AnthropicResponse) -> Option<String> {
    let text: String = response
        .content
        .iter()
        .filter(|block| block.kind == "text")
        .filter_map(|block| block.text.as_deref())
        .collect();

    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}

#[async_trait]
impl Provider for AnthropicProvider {
    async fn generate(
        &self,
        messages: &[Message],
        options: &GenerationOptions,
    ) -> Result<String> {
        let request = AnthropicRequest {
            model: &options.model,
            max_tokens: options.max_tokens,
            messages,
            system: options.system.as_deref(),
            temperature: options.temperature,
        };

        tracing::debug!(
            "Sending Anthropic request: model={}, {} messages, system={}",
            options.model,
            messages.len(),
            options.system.is_some()
        );

        let response = self
            .client
            .post(self.messages_url())
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Anthropic request failed: {}", e);
                ChatflowError::Remote(format!("Anthropic request failed: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!("Anthropic returned error {}", status);
            return Err(classify_status(status, &error_text).into());
        }

        let body: AnthropicResponse = response.json().await.map_err(|e| {
            tracing::error!("Failed to parse Anthropic response: {}", e);
            ChatflowError::Remote(format!("Failed to parse Anthropic response: {}", e))
        })?;

        if let Some(usage) = &body.usage {
            let usage = TokenUsage::new(usage.input_tokens, usage.output_tokens);
            tracing::debug!(
                "Anthropic response: stop_reason={:?}, prompt_tokens={}, completion_tokens={}, total_tokens={}",
                body.stop_reason,
                usage.prompt_tokens,
                usage.completion_tokens,
                usage.total_tokens
            );
        }

        extract_text(&body).ok_or_else(|| {
            ChatflowError::Remote("Anthropic response contained no text content".to_string())
                .into()
        })
    }
}
