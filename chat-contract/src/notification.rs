//! Payloads of the client-side side-channel notifications.

use serde::{Deserialize, Serialize};

use crate::{
    reply::{DebugFlags, UserMood},
    source::RetrievedSource,
};

/// `updateSidebar`: reasoning trace and metadata of one assistant reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SidebarUpdate {
    pub id: String,
    /// The reply's `thinking` text.
    pub content: String,
    pub user_mood: UserMood,
    #[serde(default)]
    pub matched_categories: Vec<String>,
    pub debug: DebugFlags,
}

/// `updateRagSources`: sources retrieved for one user query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RagSourcesUpdate {
    pub sources: Vec<RetrievedSource>,
    pub query: String,
    pub debug: DebugFlags,
}
