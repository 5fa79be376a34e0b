//! Wire contract shared by the orchestration endpoints and the client.
//!
//! Everything here is request-scoped: the client resends the whole ordered
//! message list with every call and nothing is stored server-side.
//!
//! - [`message`]: conversation messages and attached files
//! - [`reply`]: the validated structured reply of the support agent
//! - [`source`]: retrieved context sources (`x-rag-sources` header)
//! - [`chart`]: chart specification produced by the finance tool
//! - [`finance`]: finance endpoint request/response bodies
//! - [`notification`]: client-side side-channel payloads

pub mod chart;
pub mod finance;
pub mod message;
pub mod notification;
pub mod reply;
pub mod source;

pub use chart::{ChartConfig, ChartKind, ChartSpec, SeriesConfig, Trend, TrendDirection};
pub use finance::{FinanceErrorBody, FinanceRequest, FinanceResponse};
pub use message::{ContentPart, FileData, ImageSource, Message, MessageContent, Role};
pub use notification::{RagSourcesUpdate, SidebarUpdate};
pub use reply::{
    AssistantPayload, DebugFlags, RedirectDirective, StructuredReply, SupportRequest, UserMood,
};
pub use source::RetrievedSource;

/// Header carrying the retrieved sources as an ASCII-escaped JSON array.
pub const RAG_SOURCES_HEADER: &str = "x-rag-sources";

/// Header carrying the timestamped diagnostic blob.
pub const DEBUG_DATA_HEADER: &str = "x-debug-data";
