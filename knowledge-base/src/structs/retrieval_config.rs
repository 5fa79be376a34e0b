//! Configuration layer: reads retrieval settings from environment variables.

/// Retrieval endpoint and result-count knobs.
#[derive(Debug, Clone, PartialEq)]
pub struct RetrievalConfig {
    /// Base URL of the retrieval gateway; `None` disables retrieval.
    pub url: Option<String>,
    /// Optional bearer token for the gateway.
    pub api_key: Option<String>,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// Number of results requested from the service.
    pub max_results: usize,
    /// Number of highest-scoring results kept as context.
    pub keep: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            url: None,
            api_key: None,
            timeout_secs: 10,
            max_results: 3,
            keep: 1,
        }
    }
}

impl RetrievalConfig {
    /// Build from environment variables with defaults.
    ///
    /// - `RETRIEVAL_URL`          (unset → retrieval disabled)
    /// - `RETRIEVAL_API_KEY`
    /// - `RETRIEVAL_TIMEOUT_SECS` (10)
    /// - `RAG_MAX_RESULTS`        (3)
    /// - `RAG_KEEP`               (1)
    pub fn from_env() -> Self {
        Self::from_lookup(&|k| std::env::var(k).ok())
    }

    pub fn from_lookup(lookup: &dyn Fn(&str) -> Option<String>) -> Self {
        let dflt = Self::default();
        let non_empty = |k: &str| lookup(k).filter(|v| !v.trim().is_empty());
        Self {
            url: non_empty("RETRIEVAL_URL").map(|u| u.trim().trim_end_matches('/').to_string()),
            api_key: non_empty("RETRIEVAL_API_KEY"),
            timeout_secs: parse(lookup, "RETRIEVAL_TIMEOUT_SECS", dflt.timeout_secs),
            max_results: parse(lookup, "RAG_MAX_RESULTS", dflt.max_results).max(1),
            keep: parse(lookup, "RAG_KEEP", dflt.keep).max(1),
        }
    }
}

fn parse<T: std::str::FromStr>(lookup: &dyn Fn(&str) -> Option<String>, k: &str, dflt: T) -> T {
    lookup(k)
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(dflt)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_unset() {
        let cfg = RetrievalConfig::from_lookup(&|_| None);
        assert_eq!(cfg, RetrievalConfig::default());
    }

    #[test]
    fn reads_overrides_and_clamps() {
        let cfg = RetrievalConfig::from_lookup(&|k| match k {
            "RETRIEVAL_URL" => Some("http://kb.local/ ".into()),
            "RAG_MAX_RESULTS" => Some("5".into()),
            "RAG_KEEP" => Some("0".into()),
            "RETRIEVAL_TIMEOUT_SECS" => Some("oops".into()),
            _ => None,
        });
        assert_eq!(cfg.url.as_deref(), Some("http://kb.local"));
        assert_eq!(cfg.max_results, 5);
        assert_eq!(cfg.keep, 1);
        assert_eq!(cfg.timeout_secs, 10);
    }
}
