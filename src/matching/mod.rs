// ============================================================
// Layer 5 — Matching Layer
// ============================================================
// This layer contains ALL tokenizers-crate specific code on the
// scoring path. No other layer tokenizes text for matching.
//
// What's in this layer:
//
//   model.rs   — The match model and its lazy handle
//                Splits text into lowercase word tokens,
//                either with the built-in Whitespace
//                pre-tokenizer or with a tokenizer.json
//
//   matcher.rs — The phrase matcher
//                Indexes a taxonomy into a token trie,
//                scores clean text in one pass, reports
//                matched and missing phrases
//
// Reference: HuggingFace tokenizers documentation
//            Rust Book §16 (Shared-State Concurrency)

/// Match model and its lazily-initialised shared handle
pub mod model;

/// Taxonomy index and weighted phrase scoring
pub mod matcher;
