//! Typed error for the support-agent crate.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SupportError {
    /// Request carried no messages.
    #[error("conversation is empty")]
    EmptyConversation,

    /// Request carried no model name.
    #[error("model name is empty")]
    EmptyModel,

    /// Model call failed (transport, upstream status or decode).
    #[error("model error: {0}")]
    Model(#[from] ai_llm_service::AiLlmError),

    /// Model output is not valid JSON or violates the reply schema.
    #[error("invalid model reply: {reason}")]
    InvalidReply { reason: String, snippet: String },

    /// Category taxonomy could not be loaded.
    #[error("category taxonomy error: {0}")]
    Categories(String),
}
