// ============================================================
// Layer 2 — InspectUseCase
// ============================================================
// Reports what a resume PDF carries besides its score: page
// count, document metadata, web links and e-mail addresses.
//
// Links come from two places: URLs written in the page text and
// the targets of link annotations. Both lists are merged and
// deduplicated in order of first appearance.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use serde::Serialize;

use crate::data::contacts::{extract_emails, extract_links};
use crate::data::loader::PdfLoader;
use crate::domain::error::Result;
use crate::domain::traits::{DocumentSource, PageSource};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Inspection {
    pub source:     String,
    pub page_count: usize,
    pub metadata:   BTreeMap<String, String>,
    pub links:      Vec<String>,
    pub emails:     Vec<String>,
}

#[derive(Debug, Default)]
pub struct InspectUseCase {
    loader: PdfLoader,
}

impl InspectUseCase {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn inspect(&self, path: &Path) -> Result<Inspection> {
        let doc = self.loader.open(path)?;

        let text = (0..doc.page_count())
            .flat_map(|page| doc.fragments(page))
            .filter(|f| f.is_text())
            .map(|f| f.text.as_str())
            .collect::<Vec<_>>()
            .join("\n");

        let mut seen = HashSet::new();
        let links = extract_links(&text)
            .into_iter()
            .chain(
                doc.link_targets()
                    .into_iter()
                    .filter(|uri| uri.starts_with("http://") || uri.starts_with("https://")),
            )
            .filter(|link| seen.insert(link.clone()))
            .collect();

        let inspection = Inspection {
            source:     path.display().to_string(),
            page_count: doc.page_count(),
            metadata:   doc.metadata(),
            links,
            emails:     extract_emails(&text),
        };

        tracing::info!(
            "Inspected '{}': {} links, {} e-mail addresses",
            inspection.source,
            inspection.links.len(),
            inspection.emails.len()
        );
        Ok(inspection)
    }
}
