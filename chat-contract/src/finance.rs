use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{chart::ChartSpec, message::FileData, message::Message};

/// Body of `POST /api/finance`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinanceRequest {
    pub messages: Vec<Message>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_data: Option<FileData>,
    pub model: String,
}

/// Successful response of `POST /api/finance`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinanceResponse {
    pub content: String,
    pub has_tool_use: bool,
    /// Raw tool-use block as returned by the model.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_use: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chart_data: Option<ChartSpec>,
}

/// Error body of `POST /api/finance`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinanceErrorBody {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<u16>,
}
