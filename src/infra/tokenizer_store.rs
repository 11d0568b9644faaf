// ============================================================
// Layer 6 — Tokenizer Store
// ============================================================
// Loads the tokenizer definition behind the match model and
// writes a default one for `resume-scorer tokenizer-init`.
//
// The default is written as tokenizer JSON by hand rather than
// trained: the matcher only needs the normalizer and the
// pre-tokenizer, so a word-level model with a single [UNK]
// entry is enough for Tokenizer::from_file to accept it.
//
// Reference: HuggingFace tokenizers — Serialization format

use std::fs;
use std::path::Path;

use tokenizers::Tokenizer;

use crate::domain::error::{Result, ScoreError};

pub struct TokenizerStore;

impl TokenizerStore {
    /// Load a tokenizer definition from JSON.
    /// Any failure is reported as ModelUnavailable with the command
    /// that writes a usable default.
    pub fn load(path: &Path) -> Result<Tokenizer> {
        if !path.is_file() {
            return Err(Self::unavailable(path, "file not found"));
        }

        let tokenizer = Tokenizer::from_file(path).map_err(|e| Self::unavailable(path, e))?;
        tracing::info!("Loaded tokenizer from '{}'", path.display());
        Ok(tokenizer)
    }

    /// Write the default lowercasing whitespace tokenizer to `path`.
    pub fn write_default(path: &Path) -> std::io::Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        // ── Step 1: Word-level model with a single unknown token ──────────────
        let tokenizer_json = serde_json::json!({
            "version": "1.0",
            "truncation": null,
            "padding": null,
            "added_tokens": [
                {"id": 0, "content": "[UNK]", "single_word": false, "lstrip": false, "rstrip": false, "normalized": false, "special": true}
            ],
            "normalizer": {
                "type": "BertNormalizer",
                "clean_text": true,
                "handle_chinese_chars": true,
                "strip_accents": null,
                "lowercase": true
            },
            "pre_tokenizer": {
                "type": "Whitespace"
            },
            "post_processor": null,
            "decoder": null,
            "model": {
                "type": "WordLevel",
                "vocab": { "[UNK]": 0 },
                "unk_token": "[UNK]"
            }
        });

        // ── Step 2: Write in the format Tokenizer::from_file() expects ────────
        fs::write(path, serde_json::to_string_pretty(&tokenizer_json)?)?;

        tracing::info!("Default tokenizer written to '{}'", path.display());
        Ok(())
    }

    fn unavailable(path: &Path, reason: impl ToString) -> ScoreError {
        ScoreError::ModelUnavailable {
            path:        path.to_path_buf(),
            reason:      reason.to_string(),
            remediation: format!(
                "Run `resume-scorer tokenizer-init --out {}` to create one, \
                 or omit --tokenizer to use the built-in model.",
                path.display()
            ),
        }
    }
}
