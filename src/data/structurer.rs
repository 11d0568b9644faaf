// ============================================================
// Layer 4 — Document Structurer
// ============================================================
// Walks a document page by page and turns its text fragments
// into a linear, lightly structured text:
//
//   ## Professional Experience        ← heading
//
//   - Led a team of 5                 ← bullet
//
//   Built the billing pipeline.       ← paragraph
//
//   -----                             ← page break
//
// Each fragment goes through a fixed rule cascade (first match
// wins):
//   1. empty after trimming      → dropped
//   2. uppercase and < 60 chars  → heading, title-cased
//   3. bullet glyph + whitespace → bullet, glyph stripped
//   4. anything else             → paragraph, trimmed
//
// Images and drawings are skipped. Every page ends with one
// page-break line, even a page with no text at all.
//
// Reference: Rust Book §6 (Enums and Pattern Matching)

use crate::domain::document::{LineKind, StructuredLine};
use crate::domain::traits::PageSource;

/// Fragments shorter than this (in characters) may be headings
pub const HEADING_MAX_CHARS: usize = 60;

/// Glyphs that open a bullet line when followed by whitespace.
/// U+F0B7 is the bullet of the Symbol font as many word
/// processors export it.
pub const BULLET_GLYPHS: [char; 4] = ['•', '-', '●', '\u{F0B7}'];

/// Rendered in place of a page break
pub const PAGE_BREAK_MARKER: &str = "-----";

/// Structure every page of `doc` into ordered lines.
pub fn structure(doc: &impl PageSource) -> Vec<StructuredLine> {
    let mut lines = Vec::new();

    for page in 0..doc.page_count() {
        let before = lines.len();

        lines.extend(
            doc.fragments(page)
                .iter()
                .filter(|f| f.is_text())
                .filter_map(|f| classify(&f.text)),
        );

        tracing::debug!("Page {}: {} structured lines", page + 1, lines.len() - before);
        lines.push(StructuredLine::page_break());
    }

    lines
}

/// Apply the rule cascade to one fragment's text.
/// Returns `None` when the fragment should produce no line.
pub fn classify(text: &str) -> Option<StructuredLine> {
    let trimmed = text.trim();

    // ── Rule 1: nothing left after trimming ──────────────────────────────────
    if trimmed.is_empty() {
        return None;
    }

    // ── Rule 2: short all-caps text is a heading ─────────────────────────────
    if is_uppercase(trimmed) && trimmed.chars().count() < HEADING_MAX_CHARS {
        return Some(StructuredLine::new(LineKind::Heading, title_case(trimmed)));
    }

    // ── Rule 3: bullet glyph followed by whitespace ──────────────────────────
    if let Some(body) = strip_bullet(trimmed) {
        return Some(StructuredLine::new(LineKind::Bullet, body));
    }

    // ── Rule 4: everything else ──────────────────────────────────────────────
    Some(StructuredLine::new(LineKind::Paragraph, trimmed))
}

/// Join structured lines into markdown-flavoured text.
///
/// Lines are separated by a blank line. The page break after
/// the final page is not rendered, so markers only appear
/// between pages.
pub fn render_to_text(lines: &[StructuredLine]) -> String {
    let end = match lines.last() {
        Some(last) if last.kind == LineKind::PageBreak => lines.len() - 1,
        _ => lines.len(),
    };

    lines[..end]
        .iter()
        .map(|line| match line.kind {
            LineKind::Heading   => format!("## {}", line.text),
            LineKind::Bullet    => format!("- {}", line.text),
            LineKind::Paragraph => line.text.clone(),
            LineKind::PageBreak => PAGE_BREAK_MARKER.to_string(),
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// True when the text has at least one cased character and
/// none of its cased characters are lowercase.
fn is_uppercase(text: &str) -> bool {
    let mut saw_cased = false;
    for c in text.chars() {
        if c.is_lowercase() {
            return false;
        }
        if c.is_uppercase() {
            saw_cased = true;
        }
    }
    saw_cased
}

/// Uppercase the first letter of every word, lowercase the rest.
/// A word starts at any letter not preceded by another letter.
fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev_alpha = false;

    for c in text.chars() {
        if prev_alpha {
            out.extend(c.to_lowercase());
        } else {
            out.extend(c.to_uppercase());
        }
        prev_alpha = c.is_alphabetic();
    }
    out
}

/// Text after a leading bullet glyph and its whitespace, if the
/// text opens with one. The glyph must be followed by whitespace.
fn strip_bullet(text: &str) -> Option<&str> {
    let mut chars = text.chars();
    let first = chars.next()?;
    if !BULLET_GLYPHS.contains(&first) {
        return None;
    }

    let rest = chars.as_str();
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    Some(rest.trim_start())
}
