use crate::config::llm_provider::LlmProvider;

/// Connection settings for the hosted model API.
///
/// The model identifier is not part of this struct: both endpoints receive
/// it per request from the client.
///
/// # Fields
///
/// - `provider`: Which backend to talk to.
/// - `endpoint`: API base URL, e.g. `https://api.anthropic.com`.
/// - `api_key`: Secret sent as `x-api-key`.
/// - `api_version`: Value of the `anthropic-version` header.
/// - `timeout_secs`: Optional request timeout in seconds.
#[derive(Clone, PartialEq)]
pub struct LlmModelConfig {
    /// The backend (currently only Anthropic).
    pub provider: LlmProvider,

    /// API base URL without the `/v1/...` suffix.
    pub endpoint: String,

    /// API key for authentication.
    pub api_key: String,

    /// API version header value.
    pub api_version: String,

    /// Optional request timeout (in seconds).
    pub timeout_secs: Option<u64>,
}

impl std::fmt::Debug for LlmModelConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmModelConfig")
            .field("provider", &self.provider)
            .field("endpoint", &self.endpoint)
            .field("api_key", &"[REDACTED]")
            .field("api_version", &self.api_version)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}
