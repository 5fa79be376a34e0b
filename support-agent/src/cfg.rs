//! Runtime configuration loaded from environment variables.

use std::path::PathBuf;

use knowledge_base::RetrievalConfig;

use crate::{categories::CategoryTaxonomy, error::SupportError};

/// Config bag for the support orchestrator.
#[derive(Debug, Clone)]
pub struct SupportConfig {
    pub max_tokens: u32,
    pub temperature: f32,
    pub retrieval: RetrievalConfig,
    pub categories: CategoryTaxonomy,
    /// Byte budget of the `X-Debug-Data` header value.
    pub debug_budget: usize,
}

impl Default for SupportConfig {
    fn default() -> Self {
        Self {
            max_tokens: 1000,
            temperature: 0.3,
            retrieval: RetrievalConfig::default(),
            categories: CategoryTaxonomy::default(),
            debug_budget: 1000,
        }
    }
}

impl SupportConfig {
    /// - `SUPPORT_MAX_TOKENS`      (1000)
    /// - `SUPPORT_TEMPERATURE`     (0.3)
    /// - `SUPPORT_CATEGORIES_PATH` (embedded taxonomy when unset)
    /// - retrieval knobs, see [`RetrievalConfig::from_env`]
    pub fn from_env() -> Result<Self, SupportError> {
        Self::from_lookup(&|k| std::env::var(k).ok())
    }

    pub fn from_lookup(lookup: &dyn Fn(&str) -> Option<String>) -> Result<Self, SupportError> {
        let dflt = Self::default();
        let categories = match lookup("SUPPORT_CATEGORIES_PATH").filter(|p| !p.trim().is_empty()) {
            Some(p) => CategoryTaxonomy::from_file(&PathBuf::from(p.trim()))?,
            None => dflt.categories,
        };
        Ok(Self {
            max_tokens: parse(lookup, "SUPPORT_MAX_TOKENS", dflt.max_tokens),
            temperature: parse(lookup, "SUPPORT_TEMPERATURE", dflt.temperature),
            retrieval: RetrievalConfig::from_lookup(lookup),
            categories,
            debug_budget: dflt.debug_budget,
        })
    }
}

fn parse<T: std::str::FromStr>(lookup: &dyn Fn(&str) -> Option<String>, k: &str, dflt: T) -> T {
    lookup(k)
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(dflt)
}
