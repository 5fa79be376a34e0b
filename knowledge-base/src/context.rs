//! Failure-isolating retrieval: turns raw hits into prompt context and
//! client-facing sources.

use std::cmp::Ordering;
use std::time::Instant;

use chat_contract::RetrievedSource;
use tracing::{debug, warn};

use crate::errors::kb_error::KbError;
use crate::retriever::Retriever;
use crate::structs::{retrieval_config::RetrievalConfig, retrieval_hit::RetrievalHit};

/// Result of one retrieval attempt. Always produced, even on failure.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RetrievalOutcome {
    /// Snippets joined by blank lines; empty when nothing was found.
    pub context: String,
    pub sources: Vec<RetrievedSource>,
    /// True when the retriever answered successfully.
    pub is_rag_working: bool,
    /// Reason retrieval degraded, if it did.
    pub error: Option<String>,
}

impl RetrievalOutcome {
    fn degraded(reason: impl Into<String>) -> Self {
        Self {
            error: Some(reason.into()),
            ..Self::default()
        }
    }

    pub fn has_context(&self) -> bool {
        !self.context.trim().is_empty()
    }
}

/// Retrieve context for `query`, never failing.
///
/// Missing knowledge-base id, empty query and every retriever error yield a
/// degraded outcome (`is_rag_working = false`) logged at `warn`.
pub async fn retrieve_context(
    retriever: &dyn Retriever,
    knowledge_base_id: Option<&str>,
    query: &str,
    cfg: &RetrievalConfig,
) -> RetrievalOutcome {
    let Some(kb_id) = knowledge_base_id.map(str::trim).filter(|s| !s.is_empty()) else {
        warn!("knowledge base id missing; continuing without context");
        return RetrievalOutcome::degraded("knowledge base id missing");
    };
    if query.trim().is_empty() {
        warn!(kb_id, "empty retrieval query; continuing without context");
        return RetrievalOutcome::degraded("empty query");
    }

    let started = Instant::now();
    match retriever.retrieve(kb_id, query, cfg.max_results).await {
        Ok(hits) => {
            let sources = select_sources(hits, cfg.keep);
            let context = sources
                .iter()
                .map(|s| s.snippet.as_str())
                .collect::<Vec<_>>()
                .join("\n\n");
            debug!(
                kb_id,
                kept = sources.len(),
                latency_ms = started.elapsed().as_millis(),
                "retrieval ok"
            );
            RetrievalOutcome {
                context,
                sources,
                is_rag_working: true,
                error: None,
            }
        }
        Err(e) => {
            if !matches!(e, KbError::NotConfigured) {
                warn!(
                    kb_id,
                    error = %e,
                    latency_ms = started.elapsed().as_millis(),
                    "retrieval failed; continuing without context"
                );
            } else {
                debug!(kb_id, "retrieval not configured");
            }
            RetrievalOutcome::degraded(e.to_string())
        }
    }
}

/// Normalise hits, sort by score (descending, stable) and keep the top `keep`.
pub fn select_sources(hits: Vec<RetrievalHit>, keep: usize) -> Vec<RetrievedSource> {
    let mut sources: Vec<RetrievedSource> = hits
        .into_iter()
        .enumerate()
        .filter_map(|(i, h)| normalize_hit(i, h))
        .collect();
    sources.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    sources.truncate(keep);
    sources
}

/// Hits without text are dropped.
pub fn normalize_hit(index: usize, hit: RetrievalHit) -> Option<RetrievedSource> {
    let snippet = hit.text.filter(|t| !t.trim().is_empty())?;
    let id = hit
        .chunk_id
        .filter(|c| !c.is_empty())
        .unwrap_or_else(|| format!("chunk-{index}"));
    let file_name = hit
        .uri
        .as_deref()
        .and_then(display_name)
        .unwrap_or_else(|| format!("Source-{index}"));
    let score = hit
        .score
        .filter(|s| s.is_finite())
        .map(|s| s.clamp(0.0, 1.0))
        .unwrap_or(0.0);
    Some(RetrievedSource {
        id,
        file_name,
        snippet,
        score,
    })
}

/// `s3://bucket/docs/reset_password.txt` → `reset password`.
fn display_name(uri: &str) -> Option<String> {
    let last = uri.trim_end_matches('/').rsplit('/').next()?;
    let name = last.replace('_', " ").replace(".txt", "");
    let name = name.trim();
    (!name.is_empty()).then(|| name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::retriever::NoopRetriever;
    use async_trait::async_trait;

    struct Fixed(Result<Vec<RetrievalHit>, u16>);

    #[async_trait]
    impl Retriever for Fixed {
        async fn retrieve(
            &self,
            _kb: &str,
            _q: &str,
            _n: usize,
        ) -> Result<Vec<RetrievalHit>, KbError> {
            match &self.0 {
                Ok(h) => Ok(h.clone()),
                Err(status) => Err(KbError::Status {
                    status: *status,
                    snippet: "boom".into(),
                }),
            }
        }
    }

    fn hit(text: &str, uri: &str, score: f32) -> RetrievalHit {
        RetrievalHit {
            text: Some(text.into()),
            uri: Some(uri.into()),
            score: Some(score),
            chunk_id: None,
        }
    }

    #[tokio::test]
    async fn keeps_only_best_hit() {
        let r = Fixed(Ok(vec![
            hit("low", "s3://kb/a.txt", 0.2),
            hit("best", "s3://kb/reset_password.txt", 0.8),
            hit("mid", "s3://kb/c.txt", 0.5),
        ]));
        let out = retrieve_context(&r, Some("kb1"), "reset", &RetrievalConfig::default()).await;
        assert!(out.is_rag_working);
        assert_eq!(out.context, "best");
        assert_eq!(out.sources.len(), 1);
        assert_eq!(out.sources[0].file_name, "reset password");
        assert_eq!(out.sources[0].id, "chunk-1");
    }

    #[tokio::test]
    async fn failure_degrades() {
        let r = Fixed(Err(503));
        let out = retrieve_context(&r, Some("kb1"), "q", &RetrievalConfig::default()).await;
        assert!(!out.is_rag_working);
        assert!(out.sources.is_empty());
        assert!(!out.has_context());
        assert!(out.error.unwrap().contains("503"));
    }

    #[tokio::test]
    async fn missing_kb_id_degrades_without_calling() {
        let out = retrieve_context(&NoopRetriever, None, "q", &RetrievalConfig::default()).await;
        assert_eq!(out.error.as_deref(), Some("knowledge base id missing"));
    }

    #[test]
    fn normalisation_rules() {
        let s = normalize_hit(
            4,
            RetrievalHit {
                text: Some("t".into()),
                uri: None,
                score: Some(3.0),
                chunk_id: None,
            },
        )
        .unwrap();
        assert_eq!(s.file_name, "Source-4");
        assert_eq!(s.score, 1.0);
        assert!(normalize_hit(0, RetrievalHit::default()).is_none());
    }

    #[test]
    fn keep_several_joins_with_blank_line() {
        let kept = select_sources(
            vec![hit("a", "x/a.txt", 0.9), hit("b", "x/b.txt", 0.7)],
            2,
        );
        assert_eq!(kept.len(), 2);
        assert_eq!(kept[0].snippet, "a");
    }
}
