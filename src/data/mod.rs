// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// Everything between a PDF on disk and the clean text the
// matcher reads, plus the way back onto the page.
//
// The pipeline flows in this order:
//
//   resume.pdf
//       │
//       ▼
//   PdfLoader         → parses the file, decodes page content
//       │               into positioned fragments (content.rs)
//       │               using each page's fonts (fonts.rs)
//       ▼
//   structurer        → headings, bullets, paragraphs, breaks
//       │
//       ▼
//   Preprocessor      → strips markdown, folds case/punctuation
//       │
//       ▼
//   (Layer 5 matcher) → score + matched terms
//       │
//       ▼
//   annotator         → highlights on the original pages
//
// Each module is responsible for exactly one step.
//
// Reference: Rust Book §13 (Iterators and Closures)

/// Opens PDF files with lopdf
pub mod loader;

/// Walks a page's operator stream into fragments
pub mod content;

/// Font decoders and glyph metrics for one page
pub mod fonts;

/// Turns fragments into structured lines and text
pub mod structurer;

/// Cleans structured text for matching
pub mod preprocessor;

/// Highlights matched terms and saves the result
pub mod annotator;

/// Finds links and e-mail addresses in text
pub mod contacts;

#[cfg(test)]
pub(crate) mod fixtures;
