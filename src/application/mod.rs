// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// This layer orchestrates all the other layers to accomplish
// a specific goal (scoring, highlighting, inspecting or
// rendering a resume).
//
// Rules for this layer:
//   - No tokenization or matching logic here (that's Layer 5)
//   - No printing here (that's Layer 1)
//   - No direct PDF or file access (that's Layer 4 and 6)
//   - Only workflow coordination
//
// Reference: Clean Architecture pattern
//            Rust Book §7 (Module System)

// The scoring workflow
pub mod score_use_case;

// Highlighting matched terms into a copy of the PDF
pub mod highlight_use_case;

// Page count, metadata, links and e-mail addresses
pub mod inspect_use_case;

// The text the scorer sees
pub mod render_use_case;
