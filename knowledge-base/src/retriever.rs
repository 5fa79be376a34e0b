//! Retrieval seam used by the support orchestrator.

use async_trait::async_trait;

use crate::errors::kb_error::KbError;
use crate::structs::retrieval_hit::RetrievalHit;

/// Semantic search over a managed knowledge base.
#[async_trait]
pub trait Retriever: Send + Sync {
    /// Return up to `max_results` hits for `query` from `knowledge_base_id`.
    async fn retrieve(
        &self,
        knowledge_base_id: &str,
        query: &str,
        max_results: usize,
    ) -> Result<Vec<RetrievalHit>, KbError>;
}

/// Retriever used when no retrieval endpoint is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopRetriever;

#[async_trait]
impl Retriever for NoopRetriever {
    async fn retrieve(
        &self,
        _knowledge_base_id: &str,
        _query: &str,
        _max_results: usize,
    ) -> Result<Vec<RetrievalHit>, KbError> {
        Err(KbError::NotConfigured)
    }
}
