// ============================================================
// Layer 6 — Taxonomy Store
// ============================================================
// Reads the keyword taxonomy from JSON:
//
//   {
//     "required_keywords": ["Python", "SQL"],
//     "optional_keywords": ["Docker"]
//   }
//
// Both fields must be present. A missing file, malformed JSON
// or a missing field is a Config error. `load_or_empty` is the
// degraded mode: it logs the problem and scores against an
// empty taxonomy instead.

use std::fs;
use std::path::Path;

use crate::domain::error::{Result, ScoreError};
use crate::domain::taxonomy::KeywordTaxonomy;

/// File name looked up when no taxonomy path is given
pub const DEFAULT_TAXONOMY_FILE: &str = "config.json";

pub struct TaxonomyStore;

impl TaxonomyStore {
    pub fn load(path: &Path) -> Result<KeywordTaxonomy> {
        let raw = fs::read_to_string(path).map_err(|e| ScoreError::config(path, e))?;
        let taxonomy: KeywordTaxonomy =
            serde_json::from_str(&raw).map_err(|e| ScoreError::config(path, e))?;

        tracing::info!(
            "Loaded taxonomy from '{}': {} required, {} optional",
            path.display(),
            taxonomy.required.len(),
            taxonomy.optional.len()
        );
        Ok(taxonomy)
    }

    pub fn load_or_empty(path: &Path) -> KeywordTaxonomy {
        Self::load(path).unwrap_or_else(|e| {
            tracing::warn!("{e}; scoring against an empty taxonomy");
            KeywordTaxonomy::default()
        })
    }
}
