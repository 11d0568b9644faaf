// ============================================================
// Layer 3 — Match Results and Score Reports
// ============================================================
// MatchResult is what the matcher produces from clean text.
// ScoreReport is what a caller of `score_document` gets back:
// the match result plus the taxonomy maximum, the missing
// terms and a percentage band for display.
//
// Percentage bands:
//   >= 75  Great match
//   >= 50  Good match
//   >= 25  Okay match
//   else   Poor match

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Output of the phrase matcher for one text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    /// Sum of the weights of every distinct matched phrase
    pub score: f64,

    /// Matched phrases in taxonomy casing, deduplicated
    pub matched: BTreeSet<String>,
}

/// Coarse quality band for a percentage score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchBand {
    Great,
    Good,
    Okay,
    Poor,
}

impl MatchBand {
    pub fn from_percentage(percentage: f64) -> Self {
        if percentage >= 75.0 {
            Self::Great
        } else if percentage >= 50.0 {
            Self::Good
        } else if percentage >= 25.0 {
            Self::Okay
        } else {
            Self::Poor
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Great => "Great match",
            Self::Good  => "Good match",
            Self::Okay  => "Okay match",
            Self::Poor  => "Poor match",
        }
    }

    /// Colour name readable on a light background
    pub fn color(&self) -> &'static str {
        match self {
            Self::Great => "green",
            Self::Good  => "orange",
            Self::Okay  => "darkorange",
            Self::Poor  => "red",
        }
    }
}

impl fmt::Display for MatchBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The caller-facing result of scoring one document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreReport {
    /// File the report was computed for
    pub source: String,

    pub score: f64,

    pub max_score: f64,

    pub matched_terms: BTreeSet<String>,

    pub missing_terms: BTreeSet<String>,
}

impl ScoreReport {
    /// `score / max_score * 100`, or 0 when the taxonomy is empty
    pub fn percentage(&self) -> f64 {
        if self.max_score > 0.0 {
            self.score / self.max_score * 100.0
        } else {
            0.0
        }
    }

    pub fn band(&self) -> MatchBand {
        MatchBand::from_percentage(self.percentage())
    }
}
