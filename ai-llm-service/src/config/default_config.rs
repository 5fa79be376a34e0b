//! Default model API config loaded strictly from environment variables.
//!
//! # Environment variables
//!
//! - `ANTHROPIC_API_KEY`   = API key (mandatory)
//! - `ANTHROPIC_BASE_URL`  = API base URL (default `https://api.anthropic.com`)
//! - `ANTHROPIC_VERSION`   = `anthropic-version` header (default `2023-06-01`)
//! - `LLM_TIMEOUT_SECS`    = optional request timeout (u64)

use crate::{
    config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider},
    error_handler::{AiLlmError, must_var, opt_var, process_env, validate_http_endpoint},
};

pub const DEFAULT_ANTHROPIC_URL: &str = "https://api.anthropic.com";
pub const DEFAULT_ANTHROPIC_VERSION: &str = "2023-06-01";

/// Constructs the Anthropic config from the process environment.
///
/// # Errors
/// - [`crate::error_handler::ConfigError::MissingVar`] if `ANTHROPIC_API_KEY` is unset
/// - [`crate::error_handler::ConfigError::InvalidFormat`] if the base URL is not http(s)
/// - [`crate::error_handler::ConfigError::InvalidNumber`] if `LLM_TIMEOUT_SECS` is invalid
pub fn config_anthropic() -> Result<LlmModelConfig, AiLlmError> {
    config_anthropic_from(&process_env)
}

/// Same as [`config_anthropic`] with an explicit variable source.
pub fn config_anthropic_from(
    lookup: &dyn Fn(&str) -> Option<String>,
) -> Result<LlmModelConfig, AiLlmError> {
    let api_key = must_var(lookup, "ANTHROPIC_API_KEY")?;

    let endpoint = lookup("ANTHROPIC_BASE_URL")
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_ANTHROPIC_URL.to_string());
    validate_http_endpoint("ANTHROPIC_BASE_URL", &endpoint)?;

    let api_version = lookup("ANTHROPIC_VERSION")
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_ANTHROPIC_VERSION.to_string());

    let timeout_secs = opt_var::<u64>(lookup, "LLM_TIMEOUT_SECS", "expected u64")?;

    Ok(LlmModelConfig {
        provider: LlmProvider::Anthropic,
        endpoint: endpoint.trim().to_string(),
        api_key,
        api_version,
        timeout_secs,
    })
}
