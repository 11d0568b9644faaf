// ============================================================
// Layer 4 — Text Preprocessor
// ============================================================
// Cleans the markdown-flavoured text produced by the structurer
// before it reaches the phrase matcher.
//
// Cleaning steps (applied in order):
//   1. Replace link syntax [label](url) with label
//   2. Strip heading markers (#..######) and bullet markers
//      (- or * followed by whitespace) at the start of any line,
//      and backtick runs anywhere
//   3. Fold (default policy): lowercase, then replace every run
//      of characters that are neither word characters nor
//      whitespace with one space
//
// Under the default policy the output holds no markdown syntax
// and no punctuation, so cleaning it again changes nothing.
//
// Reference: regex crate documentation (multi-line mode)
//            Rust Book §8 (Strings in Rust)

use std::sync::LazyLock;

use regex::Regex;

static LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]+)\]\([^)]+\)").expect("valid link regex"));

static MARKUP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^#{1,6}\s*|^[-*]\s+|`+").expect("valid markup regex")
});

static PUNCTUATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s]+").expect("valid punctuation regex"));

/// Whether step 3 runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FoldPolicy {
    /// Lowercase and collapse punctuation into spaces
    #[default]
    LowercaseAndCollapse,
    /// Keep casing and punctuation; only markdown is stripped
    Preserve,
}

#[derive(Debug, Clone, Default)]
pub struct Preprocessor {
    policy: FoldPolicy,
}

impl Preprocessor {
    /// Create a Preprocessor with the default fold policy
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: FoldPolicy) -> Self {
        Self { policy }
    }

    /// Clean `text` for the phrase matcher.
    /// Takes a &str and returns an owned String.
    pub fn normalize(&self, text: &str) -> String {
        // ── Step 1: Links keep only their label ──────────────────────────────
        let step1 = LINK.replace_all(text, "$1");

        // ── Step 2: Line-leading markers and code fences ─────────────────────
        let step2 = MARKUP.replace_all(&step1, "");

        // ── Step 3: Case fold and punctuation collapse ───────────────────────
        match self.policy {
            FoldPolicy::Preserve => step2.into_owned(),
            FoldPolicy::LowercaseAndCollapse => {
                let lower = step2.to_lowercase();
                PUNCTUATION.replace_all(&lower, " ").into_owned()
            }
        }
    }
}

/// Clean `text` with the default policy
pub fn normalize(text: &str) -> String {
    Preprocessor::new().normalize(text)
}
