//! Unified error type for the knowledge-base crate.

use thiserror::Error;

/// Errors produced by a retrieval backend.
///
/// None of these reach the HTTP caller: `retrieve_context` turns every one
/// of them into a degraded "no context" outcome.
#[derive(Debug, Error)]
pub enum KbError {
    // ── Configuration ───────────────────────────────────────────────────────
    /// Retrieval is not configured (no `RETRIEVAL_URL`).
    #[error("retrieval not configured")]
    NotConfigured,

    /// Knowledge-base id missing or not usable as a path segment.
    #[error("invalid knowledge base id: '{0}'")]
    InvalidKnowledgeBase(String),

    // ── Transport ───────────────────────────────────────────────────────────
    /// HTTP client / network failure.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Upstream returned a non-success status.
    #[error("retrieval service returned {status}: {snippet}")]
    Status { status: u16, snippet: String },

    // ── Payload ─────────────────────────────────────────────────────────────
    /// Response body did not match the expected shape.
    #[error("malformed retrieval response: {0}")]
    Malformed(String),
}
