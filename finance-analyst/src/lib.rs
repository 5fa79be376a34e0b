//! Financial-analyst orchestration.
//!
//! Public API: [`handle_turn`]. It validates the request, inlines an
//! optional attached file, calls the model once with the charting tool on
//! offer, detects tool use and post-processes the chart specification.

pub mod attachment;
pub mod chart;
pub mod error;
pub mod prompt;
pub mod tool;

use std::time::Instant;

use ai_llm_service::{
    ChatModel, to_api_messages,
    types::{ContentBlock, MessageRequest, ToolChoice},
};
use chat_contract::{FinanceRequest, FinanceResponse};
use tracing::{debug, info};

pub use attachment::attach_file;
pub use chart::process_chart;
pub use error::FinanceError;
pub use tool::chart_tool;

/// Sampling parameters of the finance call.
#[derive(Debug, Clone, PartialEq)]
pub struct FinanceConfig {
    pub max_tokens: u32,
    pub temperature: f32,
}

impl Default for FinanceConfig {
    fn default() -> Self {
        Self {
            max_tokens: 4096,
            temperature: 0.7,
        }
    }
}

impl FinanceConfig {
    /// - `FINANCE_MAX_TOKENS`  (4096)
    /// - `FINANCE_TEMPERATURE` (0.7)
    pub fn from_env() -> Self {
        Self::from_lookup(&|k| std::env::var(k).ok())
    }

    pub fn from_lookup(lookup: &dyn Fn(&str) -> Option<String>) -> Self {
        let dflt = Self::default();
        Self {
            max_tokens: lookup("FINANCE_MAX_TOKENS")
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(dflt.max_tokens),
            temperature: lookup("FINANCE_TEMPERATURE")
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(dflt.temperature),
        }
    }
}

/// Run one finance turn.
///
/// # Errors
/// - validation errors ([`FinanceError::is_validation`]) before any model call
/// - [`FinanceError::Model`] when the model call fails
/// - [`FinanceError::InvalidChartData`] when the tool input is unusable
pub async fn handle_turn(
    model: &dyn ChatModel,
    request: &FinanceRequest,
    cfg: &FinanceConfig,
) -> Result<FinanceResponse, FinanceError> {
    let started = Instant::now();

    if request.messages.is_empty() {
        return Err(FinanceError::EmptyConversation);
    }
    let model_name = request.model.trim();
    if model_name.is_empty() {
        return Err(FinanceError::EmptyModel);
    }

    let mut messages = to_api_messages(&request.messages);
    attach_file(&mut messages, request.file_data.as_ref())?;

    let req = MessageRequest::new(model_name, cfg.max_tokens, messages)
        .system(prompt::SYSTEM_PROMPT)
        .temperature(cfg.temperature)
        .tools(vec![chart_tool()], ToolChoice::Auto);

    debug!(
        model = model_name,
        history = request.messages.len(),
        has_file = request.file_data.is_some(),
        "finance turn: calling model"
    );
    let resp = model.create_message(req).await?;

    let content = resp.first_text().unwrap_or_default().to_string();
    let tool_use = resp.first_tool_use();

    let (tool_use_json, chart_data) = match tool_use {
        Some(block @ ContentBlock::ToolUse { input, .. }) => {
            let json = serde_json::to_value(block)
                .map_err(|e| FinanceError::InvalidChartData(e.to_string()))?;
            (Some(json), Some(process_chart(input)?))
        }
        _ => (None, None),
    };

    info!(
        model = model_name,
        has_tool_use = tool_use_json.is_some(),
        chart = chart_data.as_ref().map(|c| format!("{:?}", c.chart_type)).unwrap_or_default(),
        latency_ms = started.elapsed().as_millis(),
        "finance turn completed"
    );

    Ok(FinanceResponse {
        content,
        has_tool_use: tool_use_json.is_some(),
        tool_use: tool_use_json,
        chart_data,
    })
}
