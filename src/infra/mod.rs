// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Handles the files that sit around a scoring run but are not
// part of any one business layer:
//
//   taxonomy_store.rs  — Keyword taxonomy persistence
//                        Reads config.json into a
//                        KeywordTaxonomy, with a degraded
//                        empty-taxonomy mode.
//
//   tokenizer_store.rs — Tokenizer persistence
//                        Loads the tokenizer.json behind the
//                        match model, or writes a default one.
//
//   run_paths.rs       — Output naming
//                        Gives every run a random id so
//                        highlighted copies never collide.
//
// Reference: Rust Book §7 (Modules)
//            Rust Book §12 (I/O and File Handling)

/// Taxonomy loading and saving
pub mod taxonomy_store;

/// Tokenizer loading and default generation
pub mod tokenizer_store;

/// Run-unique output file names
pub mod run_paths;
