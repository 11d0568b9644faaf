// ============================================================
// Layer 3 — Keyword Taxonomy
// ============================================================
// The configured phrases a document is scored against.
//
//   required — worth 1.0 each
//   optional — worth 0.5 each
//
// Casing is kept exactly as configured so it can be shown
// back to the user; matching itself is case-insensitive.
//
// The JSON field names follow the config file format:
//   { "required_keywords": [...], "optional_keywords": [...] }
// Both fields are mandatory — a missing field is a config
// error, not an empty list.

use serde::{Deserialize, Serialize};

/// Score contributed by each matched required phrase
pub const REQUIRED_WEIGHT: f64 = 1.0;

/// Score contributed by each matched optional phrase
pub const OPTIONAL_WEIGHT: f64 = 0.5;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordTaxonomy {
    #[serde(rename = "required_keywords")]
    pub required: Vec<String>,

    #[serde(rename = "optional_keywords")]
    pub optional: Vec<String>,
}

impl KeywordTaxonomy {
    pub fn new<R, O>(required: R, optional: O) -> Self
    where
        R: IntoIterator,
        R::Item: Into<String>,
        O: IntoIterator,
        O::Item: Into<String>,
    {
        Self {
            required: required.into_iter().map(Into::into).collect(),
            optional: optional.into_iter().map(Into::into).collect(),
        }
    }

    /// Highest score any document can reach.
    /// Counts list entries as configured, duplicates included.
    pub fn max_score(&self) -> f64 {
        self.required.len() as f64 * REQUIRED_WEIGHT
            + self.optional.len() as f64 * OPTIONAL_WEIGHT
    }

    pub fn is_empty(&self) -> bool {
        self.required.is_empty() && self.optional.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max_score() {
        let t = KeywordTaxonomy::new(["python", "sql"], ["docker"]);
        assert_eq!(t.max_score(), 2.5);
    }

    #[test]
    fn test_empty_max_score_is_zero() {
        let t = KeywordTaxonomy::default();
        assert!(t.is_empty());
        assert_eq!(t.max_score(), 0.0);
    }

    #[test]
    fn test_deserialize_field_names() {
        let json = r#"{"required_keywords": ["Rust"], "optional_keywords": ["Go", "Zig"]}"#;
        let t: KeywordTaxonomy = serde_json::from_str(json).unwrap();
        assert_eq!(t.required, vec!["Rust"]);
        assert_eq!(t.optional, vec!["Go", "Zig"]);
    }

    #[test]
    fn test_missing_field_is_rejected() {
        let json = r#"{"required_keywords": ["Rust"]}"#;
        assert!(serde_json::from_str::<KeywordTaxonomy>(json).is_err());
    }
}
