//! Anthropic service for non-streaming message creation.
//!
//! Minimal client around the Messages API. The URL is derived from
//! `LlmModelConfig::endpoint`:
//! - POST {endpoint}/v1/messages: single message creation (non-streaming)
//!
//! Constructor validation:
//! - `cfg.api_key` must be a valid header value
//! - `cfg.endpoint` must start with http:// or https://
//!
//! Errors are normalized via unified error types in `error_handler`.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::header;
use tracing::{debug, error, info};

use crate::{
    chat_model::ChatModel,
    config::llm_model_config::LlmModelConfig,
    error_handler::{AiLlmError, ApiError, ApiErrorKind, ConfigError, make_snippet},
    types::{ApiErrorBody, MessageRequest, MessageResponse},
};

/// Thin client for the Anthropic Messages API.
///
/// Constructed from a complete [`LlmModelConfig`]. Internally keeps a
/// preconfigured `reqwest::Client` (with timeout and default headers), so
/// one instance is shared by all requests.
#[derive(Debug)]
pub struct AnthropicService {
    client: reqwest::Client,
    cfg: LlmModelConfig,
    url_messages: String,
}

impl AnthropicService {
    /// Creates a new [`AnthropicService`] from the given config.
    ///
    /// # Errors
    /// - [`ConfigError::InvalidFormat`] if `cfg.endpoint` is not http(s)
    /// - [`ConfigError::InvalidApiKey`] if the key cannot be sent as a header
    /// - [`AiLlmError::HttpTransport`] if the HTTP client cannot be built
    pub fn new(cfg: LlmModelConfig) -> Result<Self, AiLlmError> {
        let endpoint = cfg.endpoint.trim();
        if endpoint.is_empty()
            || !(endpoint.starts_with("http://") || endpoint.starts_with("https://"))
        {
            return Err(ConfigError::InvalidFormat {
                var: "ANTHROPIC_BASE_URL",
                reason: "must start with http:// or https://",
            }
            .into());
        }

        let timeout = cfg
            .timeout_secs
            .map(Duration::from_secs)
            .unwrap_or_else(|| Duration::from_secs(120));

        let mut headers = header::HeaderMap::new();
        let mut key = header::HeaderValue::from_str(&cfg.api_key)
            .map_err(|_| ConfigError::InvalidApiKey)?;
        key.set_sensitive(true);
        headers.insert("x-api-key", key);
        headers.insert(
            "anthropic-version",
            header::HeaderValue::from_str(&cfg.api_version).map_err(|_| {
                ConfigError::InvalidFormat {
                    var: "ANTHROPIC_VERSION",
                    reason: "not a valid header value",
                }
            })?,
        );
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()?;

        let base = endpoint.trim_end_matches('/').to_string();
        let url_messages = format!("{}/v1/messages", base);

        info!(
            provider = cfg.provider.as_str(),
            endpoint = %cfg.endpoint,
            timeout_secs = timeout.as_secs(),
            "AnthropicService initialized"
        );

        Ok(Self {
            client,
            cfg,
            url_messages,
        })
    }

    pub fn config(&self) -> &LlmModelConfig {
        &self.cfg
    }
}

#[async_trait]
impl ChatModel for AnthropicService {
    /// Performs one **non-streaming** `/v1/messages` call.
    ///
    /// # Errors
    /// - [`AiLlmError::Api`] for non-2xx responses (kind from the error body)
    /// - [`AiLlmError::HttpTransport`] for client/network failures
    /// - [`AiLlmError::Decode`] if the JSON cannot be parsed
    async fn create_message(&self, request: MessageRequest) -> Result<MessageResponse, AiLlmError> {
        let started = Instant::now();

        debug!(
            model = %request.model,
            messages = request.messages.len(),
            tools = request.tools.len(),
            has_system = request.system.is_some(),
            max_tokens = request.max_tokens,
            "POST {}", self.url_messages
        );

        let resp = self
            .client
            .post(&self.url_messages)
            .json(&request)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let url = self.url_messages.clone();
            let text = resp.text().await.unwrap_or_default();

            let parsed = serde_json::from_str::<ApiErrorBody>(&text).ok();
            let kind = ApiErrorKind::classify(parsed.as_ref().map(|b| b.error.kind.as_str()), status);
            let message = parsed
                .map(|b| b.error.message)
                .unwrap_or_else(|| make_snippet(&text));

            error!(
                model = %request.model,
                %status,
                %url,
                ?kind,
                %message,
                latency_ms = started.elapsed().as_millis(),
                "/v1/messages returned non-success status"
            );

            return Err(ApiError {
                status,
                kind,
                url,
                message,
            }
            .into());
        }

        let out: MessageResponse = match resp.json().await {
            Ok(v) => v,
            Err(e) => {
                error!(
                    model = %request.model,
                    error = %e,
                    latency_ms = started.elapsed().as_millis(),
                    "failed to decode /v1/messages response"
                );
                return Err(AiLlmError::Decode(format!(
                    "serde error: {e}; expected `content[]` blocks"
                )));
            }
        };

        info!(
            model = %request.model,
            stop_reason = out.stop_reason.as_deref().unwrap_or("n/a"),
            blocks = out.content.len(),
            output_tokens = out.usage.as_ref().map(|u| u.output_tokens).unwrap_or(0),
            latency_ms = started.elapsed().as_millis(),
            "message created"
        );

        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::llm_provider::LlmProvider;

    fn cfg(endpoint: &str) -> LlmModelConfig {
        LlmModelConfig {
            provider: LlmProvider::Anthropic,
            endpoint: endpoint.into(),
            api_key: "sk-test".into(),
            api_version: "2023-06-01".into(),
            timeout_secs: Some(5),
        }
    }

    #[test]
    fn builds_messages_url() {
        let svc = AnthropicService::new(cfg("https://api.example.com/")).unwrap();
        assert_eq!(svc.url_messages, "https://api.example.com/v1/messages");
    }

    #[test]
    fn rejects_bad_endpoint() {
        assert!(AnthropicService::new(cfg("api.example.com")).is_err());
    }

    #[test]
    fn rejects_unsendable_key() {
        let mut c = cfg("https://api.example.com");
        c.api_key = "bad\nkey".into();
        assert!(matches!(
            AnthropicService::new(c),
            Err(AiLlmError::Config(ConfigError::InvalidApiKey))
        ));
    }
}
