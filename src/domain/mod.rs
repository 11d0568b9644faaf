// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Plain Rust structs, enums and traits that name the core
// concepts of the scorer:
//
//   document.rs — page fragments and structured lines
//   taxonomy.rs — the weighted keyword taxonomy
//   report.rs   — match results and the caller-facing report
//   traits.rs   — seams to the document backend
//   error.rs    — the error kinds every layer reports
//
// Rules for this layer:
//   - NO lopdf or tokenizers types here
//   - NO file I/O
//   - Only data and the small amount of logic that belongs to it
//
// Reference: Rust Book §5 (Structs), §6 (Enums), §10 (Traits)

// Positioned fragments and structured lines of a document
pub mod document;

// Required / optional keyword lists
pub mod taxonomy;

// Scores, matched terms and percentage bands
pub mod report;

// Abstractions the data layer implements
pub mod traits;

// Error kinds shared by all layers
pub mod error;
