// ============================================================
// Layer 4 — Contact Extraction
// ============================================================
// Pulls web links and e-mail addresses out of a document's
// text for the `inspect` command.
//
//   extract_links  — http:// and https:// URLs
//   extract_emails — name@domain.tld addresses
//
// Both return distinct values in order of first appearance.
// Trailing sentence punctuation is not part of a link.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

static LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\bhttps?://[^\s<>()\[\]{}"']+"#).expect("valid link regex")
});

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b").expect("valid email regex")
});

/// Every distinct http(s) link in `text`
pub fn extract_links(text: &str) -> Vec<String> {
    distinct(
        LINK.find_iter(text)
            .map(|m| m.as_str().trim_end_matches(['.', ',', ';', ':', '!', '?'])),
    )
}

/// Every distinct e-mail address in `text`
pub fn extract_emails(text: &str) -> Vec<String> {
    distinct(EMAIL.find_iter(text).map(|m| m.as_str()))
}

fn distinct<'a>(items: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    items
        .filter(|item| seen.insert(*item))
        .map(str::to_string)
        .collect()
}
