//! Unified error handling for `ai-llm-service`.
//!
//! This module exposes a single top-level error type [`AiLlmError`] for the whole
//! library, and groups domain-specific errors in nested enums (e.g., [`ConfigError`],
//! [`ApiError`]). Small helpers for reading/validating configuration variables are
//! provided and return the unified [`Result<T>`] alias.
//!
//! All messages include the suffix `[AI LLM Service]` to simplify attribution in logs.

use reqwest::StatusCode;
use thiserror::Error;

/* ------------------------------------------------------------------------- */
/* Public result alias                                                       */
/* ------------------------------------------------------------------------- */

/// Unified result alias for the entire crate.
pub type Result<T> = std::result::Result<T, AiLlmError>;

/* ------------------------------------------------------------------------- */
/* Top-level error                                                           */
/* ------------------------------------------------------------------------- */

/// Top-level error for the `ai-llm-service` crate.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum AiLlmError {
    /// Configuration/validation errors (startup/readiness).
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Upstream answered with a non-successful status.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Underlying HTTP transport error (e.g., `reqwest::Error`).
    #[error("[AI LLM Service] transport error: {0}")]
    HttpTransport(#[from] reqwest::Error),

    /// 2xx response whose body did not match the expected shape.
    #[error("[AI LLM Service] failed to decode response: {0}")]
    Decode(String),
}

impl AiLlmError {
    /// `true` when the upstream rejected our credentials.
    pub fn is_authentication(&self) -> bool {
        matches!(
            self,
            AiLlmError::Api(ApiError {
                kind: ApiErrorKind::Authentication,
                ..
            })
        )
    }

    /// Upstream HTTP status, if the error came from a response.
    pub fn upstream_status(&self) -> Option<StatusCode> {
        match self {
            AiLlmError::Api(e) => Some(e.status),
            _ => None,
        }
    }
}

/* ------------------------------------------------------------------------- */
/* Upstream API errors                                                       */
/* ------------------------------------------------------------------------- */

/// Error category reported by the Messages API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    Authentication,
    Permission,
    NotFound,
    RateLimited,
    InvalidRequest,
    Overloaded,
    Server,
    Other,
}

impl ApiErrorKind {
    /// Classifies from the error body `type` first, HTTP status second.
    pub fn classify(error_type: Option<&str>, status: StatusCode) -> Self {
        match error_type {
            Some("authentication_error") => return ApiErrorKind::Authentication,
            Some("permission_error") => return ApiErrorKind::Permission,
            Some("not_found_error") => return ApiErrorKind::NotFound,
            Some("rate_limit_error") => return ApiErrorKind::RateLimited,
            Some("invalid_request_error") => return ApiErrorKind::InvalidRequest,
            Some("overloaded_error") => return ApiErrorKind::Overloaded,
            Some("api_error") => return ApiErrorKind::Server,
            _ => {}
        }
        match status.as_u16() {
            401 => ApiErrorKind::Authentication,
            403 => ApiErrorKind::Permission,
            404 => ApiErrorKind::NotFound,
            429 => ApiErrorKind::RateLimited,
            400 | 413 | 422 => ApiErrorKind::InvalidRequest,
            529 => ApiErrorKind::Overloaded,
            500..=599 => ApiErrorKind::Server,
            _ => ApiErrorKind::Other,
        }
    }
}

/// Non-2xx answer from the model API.
#[derive(Debug, Error)]
#[error("[AI LLM Service] HTTP {status} ({kind:?}) from {url}: {message}")]
pub struct ApiError {
    /// Numeric HTTP status code.
    pub status: StatusCode,
    pub kind: ApiErrorKind,
    /// Request URL.
    pub url: String,
    /// Upstream error message, or a short body snippet when unparseable.
    pub message: String,
}

/* ------------------------------------------------------------------------- */
/* Config errors                                                             */
/* ------------------------------------------------------------------------- */

/// Error enum for environment/config-driven setup.
///
/// Keep this focused: only errors that realistically happen at config
/// load/validation time.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Required environment variable is missing or empty.
    #[error("[AI LLM Service] missing required environment variable: {0}")]
    MissingVar(&'static str),

    /// A number failed to parse (like ports, limits, timeouts).
    #[error("[AI LLM Service] invalid number in {var}: {reason}")]
    InvalidNumber {
        /// Variable name (e.g., `LLM_TIMEOUT_SECS`).
        var: &'static str,
        /// Human-readable reason (e.g., `expected u32`).
        reason: &'static str,
    },

    /// Value had the wrong format (e.g., invalid URL).
    #[error("[AI LLM Service] invalid format in {var}: {reason}")]
    InvalidFormat {
        /// Variable name (e.g., `ANTHROPIC_BASE_URL`).
        var: &'static str,
        /// Explanation (e.g., `must start with http:// or https://`).
        reason: &'static str,
    },

    /// API key cannot be sent as a header value.
    #[error("[AI LLM Service] API key contains characters not allowed in headers")]
    InvalidApiKey,
}

/* ------------------------------------------------------------------------- */
/* Variable helpers (return unified `Result<T>`)                             */
/* ------------------------------------------------------------------------- */

/// Reads a variable from the process environment.
///
/// Passed as the lookup to the `*_var` helpers in production; tests pass a
/// closure over a fixed map instead.
pub fn process_env(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

/// Fetches a required, non-empty variable.
///
/// # Errors
/// Returns [`AiLlmError::Config`] with [`ConfigError::MissingVar`] if the
/// variable is absent or empty.
pub fn must_var(lookup: &dyn Fn(&str) -> Option<String>, name: &'static str) -> Result<String> {
    match lookup(name) {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ConfigError::MissingVar(name).into()),
    }
}

/// Parses an optional number (`Ok(None)` if unset/empty).
///
/// # Errors
/// Returns [`AiLlmError::Config`] with [`ConfigError::InvalidNumber`] if the
/// variable is set but does not parse as `T`.
pub fn opt_var<T: std::str::FromStr>(
    lookup: &dyn Fn(&str) -> Option<String>,
    name: &'static str,
    reason: &'static str,
) -> Result<Option<T>> {
    match lookup(name) {
        Some(v) if !v.trim().is_empty() => v
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| AiLlmError::from(ConfigError::InvalidNumber { var: name, reason })),
        _ => Ok(None),
    }
}

/* ------------------------------------------------------------------------- */
/* Validation helpers                                                        */
/* ------------------------------------------------------------------------- */

/// Validates that an HTTP endpoint starts with `http://` or `https://`.
///
/// # Errors
/// Returns [`AiLlmError::Config`] with [`ConfigError::InvalidFormat`] when
/// the string does not start with a valid HTTP scheme.
pub fn validate_http_endpoint(var: &'static str, value: &str) -> Result<()> {
    let v = value.trim();
    if v.starts_with("http://") || v.starts_with("https://") {
        Ok(())
    } else {
        Err(ConfigError::InvalidFormat {
            var,
            reason: "must start with http:// or https://",
        }
        .into())
    }
}

/// Trims an upstream body to a log-friendly snippet.
pub fn make_snippet(text: &str) -> String {
    const MAX: usize = 240;
    let trimmed = text.trim();
    if trimmed.chars().count() <= MAX {
        trimmed.to_string()
    } else {
        let mut s: String = trimmed.chars().take(MAX).collect();
        s.push('…');
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(map: HashMap<&'static str, &'static str>) -> impl Fn(&str) -> Option<String> {
        move |k| map.get(k).map(|v| v.to_string())
    }

    #[test]
    fn classify_prefers_body_type() {
        assert_eq!(
            ApiErrorKind::classify(Some("authentication_error"), StatusCode::BAD_REQUEST),
            ApiErrorKind::Authentication
        );
        assert_eq!(
            ApiErrorKind::classify(None, StatusCode::UNAUTHORIZED),
            ApiErrorKind::Authentication
        );
        assert_eq!(
            ApiErrorKind::classify(Some("something_new"), StatusCode::TOO_MANY_REQUESTS),
            ApiErrorKind::RateLimited
        );
        assert_eq!(
            ApiErrorKind::classify(None, StatusCode::IM_A_TEAPOT),
            ApiErrorKind::Other
        );
    }

    #[test]
    fn must_var_rejects_blank() {
        let l = lookup(HashMap::from([("K", "  ")]));
        assert!(matches!(
            must_var(&l, "K"),
            Err(AiLlmError::Config(ConfigError::MissingVar("K")))
        ));
    }

    #[test]
    fn opt_var_parses_or_reports() {
        let l = lookup(HashMap::from([("N", "42"), ("BAD", "x")]));
        assert_eq!(opt_var::<u32>(&l, "N", "expected u32").unwrap(), Some(42));
        assert_eq!(opt_var::<u32>(&l, "MISSING", "expected u32").unwrap(), None);
        assert!(opt_var::<u32>(&l, "BAD", "expected u32").is_err());
    }

    #[test]
    fn snippet_is_bounded() {
        let long = "a".repeat(1000);
        assert_eq!(make_snippet(&long).chars().count(), 241);
        assert_eq!(make_snippet("  ok "), "ok");
    }
}
