use serde::{Deserialize, Serialize};

/// One retrieved context snippet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetrievedSource {
    pub id: String,
    pub file_name: String,
    pub snippet: String,
    /// Relevance in `[0, 1]`.
    pub score: f32,
}
