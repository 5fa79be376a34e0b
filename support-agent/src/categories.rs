//! Category taxonomy the model tags replies with.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::SupportError;

const DEFAULT_CATEGORIES: &str = include_str!("../assets/categories.json");

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryTaxonomy {
    pub categories: Vec<Category>,
}

impl Default for CategoryTaxonomy {
    fn default() -> Self {
        // Embedded asset is covered by `embedded_taxonomy_parses`.
        Self::from_json(DEFAULT_CATEGORIES).unwrap_or(Self {
            categories: Vec::new(),
        })
    }
}

impl CategoryTaxonomy {
    pub fn from_json(s: &str) -> Result<Self, SupportError> {
        let t: Self =
            serde_json::from_str(s).map_err(|e| SupportError::Categories(e.to_string()))?;
        if t.categories.iter().any(|c| c.id.trim().is_empty()) {
            return Err(SupportError::Categories("category with empty id".into()));
        }
        Ok(t)
    }

    pub fn from_file(path: &Path) -> Result<Self, SupportError> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| SupportError::Categories(format!("{}: {e}", path.display())))?;
        Self::from_json(&raw)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().map(|c| c.id.as_str())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids().any(|c| c == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_taxonomy_parses() {
        let t = CategoryTaxonomy::from_json(DEFAULT_CATEGORIES).unwrap();
        assert!(t.contains("account_management"));
        assert_eq!(CategoryTaxonomy::default(), t);
    }

    #[test]
    fn rejects_blank_ids() {
        let err = CategoryTaxonomy::from_json(r#"{"categories":[{"id":" ","description":"x"}]}"#);
        assert!(matches!(err, Err(SupportError::Categories(_))));
    }
}
