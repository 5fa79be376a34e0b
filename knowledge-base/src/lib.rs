//! Public API:
//! - `Retriever`: seam over the managed knowledge-base service.
//! - `HttpRetriever`: HTTP implementation; `NoopRetriever` when disabled.
//! - `retrieve_context`: normalise + rank hits, degrade on any failure.

pub mod client;
pub mod context;
pub mod errors;
pub mod retriever;
pub mod structs;

use std::sync::Arc;

use tracing::info;

pub use client::HttpRetriever;
pub use context::{RetrievalOutcome, retrieve_context};
pub use errors::kb_error::KbError;
pub use retriever::{NoopRetriever, Retriever};
pub use structs::{retrieval_config::RetrievalConfig, retrieval_hit::RetrievalHit};

/// Build the retriever selected by `cfg`: HTTP when a URL is set, otherwise
/// a no-op that always degrades.
pub fn retriever_from_config(cfg: &RetrievalConfig) -> Result<Arc<dyn Retriever>, KbError> {
    match HttpRetriever::from_config(cfg)? {
        Some(http) => {
            info!(
                url = cfg.url.as_deref().unwrap_or_default(),
                max_results = cfg.max_results,
                keep = cfg.keep,
                "knowledge base retrieval enabled"
            );
            Ok(Arc::new(http))
        }
        None => {
            info!("RETRIEVAL_URL not set; knowledge base retrieval disabled");
            Ok(Arc::new(NoopRetriever))
        }
    }
}
