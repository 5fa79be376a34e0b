//! Object-safe seam over the model API.

use async_trait::async_trait;

use crate::{
    error_handler::AiLlmError,
    types::{MessageRequest, MessageResponse},
};

/// Single-shot, non-streaming model invocation.
///
/// Implementations perform exactly one upstream call per invocation; callers
/// never retry.
#[async_trait]
pub trait ChatModel: Send + Sync {
    async fn create_message(&self, request: MessageRequest) -> Result<MessageResponse, AiLlmError>;
}
