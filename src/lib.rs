// ============================================================
// resume-scorer
// ============================================================
// Reads resume PDFs, scores their text against a weighted
// keyword taxonomy, and highlights the matched terms in a copy
// of the original.
//
//   cli          — Layer 1: argument parsing and printing
//   application  — Layer 2: use cases
//   domain       — Layer 3: types, traits, errors
//   data         — Layer 4: PDF reading, structuring, cleaning
//   matching     — Layer 5: match model and phrase matcher
//   infra        — Layer 6: taxonomy, tokenizer, output paths

pub mod cli;
pub mod application;
pub mod domain;
pub mod data;
pub mod matching;
pub mod infra;
