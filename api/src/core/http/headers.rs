//! Side-channel response headers of the support endpoint.

use axum::http::{HeaderMap, HeaderName, HeaderValue};
use chat_contract::RetrievedSource;
use serde::Serialize;
use services::header::{ascii_escape_json, header_safe};
use tracing::warn;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// `x-rag-sources`: ASCII-escaped JSON array; `None` when there are no sources.
pub fn rag_sources_value(sources: &[RetrievedSource]) -> Option<HeaderValue> {
    if sources.is_empty() {
        return None;
    }
    let json = serde_json::to_string(sources).ok()?;
    HeaderValue::from_str(&ascii_escape_json(&json)).ok()
}

/// `X-Debug-Data`: ASCII-escaped JSON cut to `budget` bytes.
///
/// The cut may leave the JSON unterminated; consumers treat it as opaque.
pub fn debug_data_value<T: Serialize>(debug: &T, budget: usize) -> Option<HeaderValue> {
    let json = serde_json::to_string(debug).ok()?;
    HeaderValue::from_str(&header_safe(&json, budget)).ok()
}

/// Insert `value` under `name`, logging values that could not be rendered.
pub fn insert_opt(headers: &mut HeaderMap, name: &'static str, value: Option<HeaderValue>) {
    match value {
        Some(v) => {
            headers.insert(HeaderName::from_static(name), v);
        }
        None => warn!(header = name, "header value not rendered"),
    }
}
