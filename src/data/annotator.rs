// ============================================================
// Layer 4 — Annotator
// ============================================================
// Marks every on-page occurrence of every matched term.
//
// Matched terms come back from the matcher in taxonomy casing
// ("Python"), while the page may say "PYTHON" or "python", so
// the page search ignores case.
//
// The normalized text can differ from what is drawn, e.g. a
// word hyphenated across a line break. A term the page search
// cannot find is skipped and listed in the summary.
//
// Works on anything that is both a PageSource and a
// Highlighter, so tests can run it against an in-memory page.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Serialize;

use crate::domain::error::Result;
use crate::domain::traits::{Highlighter, PageSource};

/// What `annotate` did, per term.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HighlightSummary {
    /// Highlight marks placed for each term that was found
    pub highlights: BTreeMap<String, usize>,

    /// Terms with no on-page occurrence
    pub not_found: Vec<String>,
}

impl HighlightSummary {
    pub fn total(&self) -> usize {
        self.highlights.values().sum()
    }
}

/// Highlight every occurrence of every term on every page.
pub fn annotate<D>(doc: &mut D, matched_terms: &[String]) -> Result<HighlightSummary>
where
    D: PageSource + Highlighter,
{
    let mut summary = HighlightSummary::default();

    for term in matched_terms {
        let mut count = 0;

        for page in 0..doc.page_count() {
            let regions = doc.search(page, term);
            for rect in regions {
                doc.add_highlight(page, rect)?;
                count += 1;
            }
        }

        if count == 0 {
            tracing::debug!("No on-page occurrence of '{}', skipping", term);
            summary.not_found.push(term.clone());
        } else {
            tracing::debug!("Highlighted '{}' {} times", term, count);
            summary.highlights.insert(term.clone(), count);
        }
    }

    tracing::info!(
        "Placed {} highlights for {} terms",
        summary.total(),
        summary.highlights.len()
    );
    Ok(summary)
}

/// Write the annotated document to `destination`.
pub fn persist<D: Highlighter>(doc: &mut D, destination: &Path) -> Result<()> {
    doc.save(destination)
}
