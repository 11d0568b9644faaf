// ============================================================
// Layer 3 — Error Kinds
// ============================================================
// Every failure the library reports is one of these. None of
// them are transient, so nothing is retried: the same input in
// the same environment fails the same way.
//
//   Config           — taxonomy file missing or malformed
//   DocumentRead     — source PDF unreadable or corrupt
//   ModelUnavailable — tokenizer definition cannot be loaded
//   Tokenization     — tokenizer failed while splitting text
//   AnnotationWrite  — annotated PDF cannot be written
//
// The binary wraps these in anyhow with extra context.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScoreError {
    #[error("configuration error in '{}': {reason}", path.display())]
    Config { path: PathBuf, reason: String },

    #[error("cannot read document '{}': {reason}", path.display())]
    DocumentRead { path: PathBuf, reason: String },

    #[error("matching model unavailable at '{}': {reason}\n\n{remediation}", path.display())]
    ModelUnavailable {
        path: PathBuf,
        reason: String,
        remediation: String,
    },

    #[error("tokenization failed: {0}")]
    Tokenization(String),

    #[error("cannot write annotated document to '{}': {reason}", path.display())]
    AnnotationWrite { path: PathBuf, reason: String },
}

impl ScoreError {
    pub fn config(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::Config { path: path.into(), reason: reason.to_string() }
    }

    pub fn document_read(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::DocumentRead { path: path.into(), reason: reason.to_string() }
    }

    pub fn annotation_write(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::AnnotationWrite { path: path.into(), reason: reason.to_string() }
    }
}

pub type Result<T, E = ScoreError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_path() {
        let e = ScoreError::document_read("/tmp/cv.pdf", "not a PDF");
        assert_eq!(e.to_string(), "cannot read document '/tmp/cv.pdf': not a PDF");
    }

    #[test]
    fn test_model_unavailable_includes_remediation() {
        let e = ScoreError::ModelUnavailable {
            path: "tok.json".into(),
            reason: "missing".into(),
            remediation: "run tokenizer-init".into(),
        };
        assert!(e.to_string().contains("run tokenizer-init"));
    }
}
