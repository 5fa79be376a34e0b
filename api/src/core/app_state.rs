use std::sync::Arc;

use ai_llm_service::{AnthropicService, ChatModel, config::default_config::config_anthropic};
use finance_analyst::FinanceConfig;
use knowledge_base::{Retriever, retriever_from_config};
use support_agent::SupportConfig;
use tracing::info;

use crate::error_handler::AppResult;

/// Shared state for all HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    /// Model API client shared by both orchestrators.
    pub model: Arc<dyn ChatModel>,
    /// Knowledge-base retriever (no-op when retrieval is not configured).
    pub retriever: Arc<dyn Retriever>,
    pub support: SupportConfig,
    pub finance: FinanceConfig,
}

impl AppState {
    pub fn new(
        model: Arc<dyn ChatModel>,
        retriever: Arc<dyn Retriever>,
        support: SupportConfig,
        finance: FinanceConfig,
    ) -> Self {
        Self {
            model,
            retriever,
            support,
            finance,
        }
    }

    /// Load shared state from environment variables.
    ///
    /// # Errors
    /// Missing `ANTHROPIC_API_KEY`, malformed numeric knobs, an unreadable
    /// category file or an unbuildable HTTP client.
    pub fn from_env() -> AppResult<Self> {
        let llm_cfg = config_anthropic()?;
        let model = AnthropicService::new(llm_cfg)?;

        let support = SupportConfig::from_env()?;
        let retriever = retriever_from_config(&support.retrieval)?;
        let finance = FinanceConfig::from_env();

        info!(
            categories = support.categories.categories.len(),
            support_max_tokens = support.max_tokens,
            finance_max_tokens = finance.max_tokens,
            "application state loaded"
        );

        Ok(Self::new(Arc::new(model), retriever, support, finance))
    }
}
