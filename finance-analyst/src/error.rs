//! Typed error for the finance-analyst crate.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FinanceError {
    #[error("messages must not be empty")]
    EmptyConversation,

    #[error("model must not be empty")]
    EmptyModel,

    /// Attachment type neither text nor a supported image.
    #[error("unsupported file type: {media_type}")]
    UnsupportedFile { media_type: String },

    /// Attachment payload could not be decoded.
    #[error("invalid file '{file_name}': {reason}")]
    InvalidFile { file_name: String, reason: String },

    /// Tool input does not describe a usable chart.
    #[error("invalid chart data: {0}")]
    InvalidChartData(String),

    /// Model call failed.
    #[error(transparent)]
    Model(#[from] ai_llm_service::AiLlmError),
}

impl FinanceError {
    /// Errors caused by the caller's input (reported as 400).
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            FinanceError::EmptyConversation
                | FinanceError::EmptyModel
                | FinanceError::UnsupportedFile { .. }
                | FinanceError::InvalidFile { .. }
        )
    }
}
