//! Shared model-inference client for the chat orchestrators.
//!
//! - [`config`]: model config + env loading
//! - [`types`]: Messages API request/response payloads
//! - [`convert`]: conversation messages → API messages
//! - [`chat_model`]: the [`ChatModel`] seam used by orchestrators and tests
//! - [`services`]: concrete provider clients
//! - [`error_handler`]: unified [`AiLlmError`] and env helpers
//! - [`telemetry`]: library-scoped tracing layer

pub mod chat_model;
pub mod config;
pub mod convert;
pub mod error_handler;
pub mod services;
pub mod telemetry;
pub mod types;

pub use chat_model::ChatModel;
pub use convert::to_api_messages;
pub use config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider};
pub use error_handler::{AiLlmError, ApiErrorKind};
pub use services::anthropic_service::AnthropicService;
