//! Declaration of the charting tool offered to the model.

use ai_llm_service::types::ToolDefinition;
use chat_contract::ChartKind;
use serde_json::json;

pub const CHART_TOOL_NAME: &str = "generate_graph_data";

/// The `generate_graph_data` tool with its JSON Schema input.
pub fn chart_tool() -> ToolDefinition {
    ToolDefinition {
        name: CHART_TOOL_NAME.to_string(),
        description: "Generate structured JSON data for creating financial charts and graphs."
            .to_string(),
        input_schema: json!({
            "type": "object",
            "properties": {
                "chartType": {
                    "type": "string",
                    "enum": ChartKind::ALL,
                    "description": "The type of chart to generate"
                },
                "config": {
                    "type": "object",
                    "properties": {
                        "title": { "type": "string" },
                        "description": { "type": "string" },
                        "trend": {
                            "type": "object",
                            "properties": {
                                "percentage": { "type": "number" },
                                "direction": { "type": "string", "enum": ["up", "down"] }
                            },
                            "required": ["percentage", "direction"]
                        },
                        "footer": { "type": "string" },
                        "totalLabel": { "type": "string" },
                        "xAxisKey": { "type": "string" }
                    },
                    "required": ["title", "description"]
                },
                "data": {
                    "type": "array",
                    "items": { "type": "object", "additionalProperties": true }
                },
                "chartConfig": {
                    "type": "object",
                    "additionalProperties": {
                        "type": "object",
                        "properties": {
                            "label": { "type": "string" },
                            "stacked": { "type": "boolean" }
                        },
                        "required": ["label"]
                    }
                }
            },
            "required": ["chartType", "config", "data", "chartConfig"]
        }),
    }
}
