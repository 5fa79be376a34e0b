//! Headless client for the support and finance endpoints.
//!
//! - [`conversation`]: ordered message list with pending/resolved/failed turns
//! - [`composer`]: request bodies and attachment classification
//! - [`interpreter`]: payload → display text, redirect and suggestions
//! - [`bus`]: `updateSidebar` / `updateRagSources` fan-out
//! - [`panels`]: bounded display feeds and panel flags
//! - [`transport`]: HTTP clients driving one turn each

pub mod bus;
pub mod composer;
pub mod conversation;
pub mod error;
pub mod interpreter;
pub mod panels;
pub mod transport;

pub use bus::{Notification, NotificationBus, Subscription, Topic};
pub use composer::{AttachedFile, FileKind, compose_finance, compose_support};
pub use conversation::{Conversation, Entry, PENDING_TIMEOUT, TurnState};
pub use error::ClientError;
pub use interpreter::{
    DisplayStatus, GENERIC_ERROR, PendingDisplay, RedirectAffordance, Rendered, interpret,
    interpret_raw,
};
pub use panels::{BoundedFeed, PANEL_CAPACITY, PanelHost, SourcesPanel, ThinkingPanel, UiConfig};
pub use transport::{FinanceClient, SupportClient};
