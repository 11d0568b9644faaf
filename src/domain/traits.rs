// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// The scorer only needs three things from a document backend:
//
//   DocumentSource — open a file into a paged document
//   PageSource     — read fragments per page, search a page
//   Highlighter    — mark a region and save the result
//
// PdfDocument (Layer 4) implements all of them on top of
// lopdf. Tests implement PageSource on plain vectors so the
// structurer and annotator run without any PDF at all.
//
// Reference: Rust Book §10 (Traits: Defining Shared Behaviour)

use std::path::Path;

use crate::domain::document::{RawFragment, Rect};
use crate::domain::error::Result;

// ─── DocumentSource ───────────────────────────────────────────────────────────
/// Anything that can open a file into a paged document.
pub trait DocumentSource {
    type Document: PageSource;

    /// Open and fully parse the document at `path`.
    /// A corrupt or unreadable file is a `DocumentRead` error —
    /// never a partially parsed document.
    fn open(&self, path: &Path) -> Result<Self::Document>;
}

// ─── PageSource ───────────────────────────────────────────────────────────────
/// Read access to a parsed document, page by page.
pub trait PageSource {
    /// Number of pages in the document
    fn page_count(&self) -> usize;

    /// Fragments of page `page` in parser order.
    /// Out-of-range pages have no fragments.
    fn fragments(&self, page: usize) -> &[RawFragment];

    /// Every region on `page` where `needle` occurs, ignoring case.
    ///
    /// The default searches each text fragment separately and takes
    /// the sub-rectangle from the fragment's char positions, so an
    /// occurrence split across two fragments is not found.
    fn search(&self, page: usize, needle: &str) -> Vec<Rect> {
        let needle: Vec<char> = needle.trim().chars().collect();
        if needle.is_empty() {
            return Vec::new();
        }

        let mut hits = Vec::new();
        for fragment in self.fragments(page).iter().filter(|f| f.is_text()) {
            let hay: Vec<char> = fragment.text.chars().collect();
            for (start, end) in find_ignore_case(&hay, &needle) {
                hits.push(fragment.char_span(start, end));
            }
        }
        hits
    }
}

// ─── Highlighter ──────────────────────────────────────────────────────────────
/// Write access: add highlight marks and persist the document.
pub trait Highlighter {
    /// Place one highlight mark over `rect` on page `page`
    fn add_highlight(&mut self, page: usize, rect: Rect) -> Result<()>;

    /// Write the whole document, marks included, to `destination`
    fn save(&mut self, destination: &Path) -> Result<()>;
}

/// Non-overlapping, case-insensitive occurrences of `needle`
/// in `hay`, as `(start, end)` character indices.
fn find_ignore_case(hay: &[char], needle: &[char]) -> Vec<(usize, usize)> {
    let mut found = Vec::new();
    if needle.len() > hay.len() {
        return found;
    }

    let mut i = 0;
    while i + needle.len() <= hay.len() {
        let window = &hay[i..i + needle.len()];
        if window.iter().zip(needle).all(|(a, b)| chars_eq_ignore_case(*a, *b)) {
            found.push((i, i + needle.len()));
            i += needle.len();
        } else {
            i += 1;
        }
    }
    found
}

fn chars_eq_ignore_case(a: char, b: char) -> bool {
    a == b || a.to_lowercase().eq(b.to_lowercase())
}
