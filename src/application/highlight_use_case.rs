// ============================================================
// Layer 2 — HighlightUseCase
// ============================================================
// Opens a PDF, highlights every on-page occurrence of the given
// terms, and saves the annotated copy. The source file is never
// written to.
//
//   Step 1: Open the PDF             (Layer 4 - data)
//   Step 2: Annotate matched terms   (Layer 4 - data)
//   Step 3: Save to the destination  (Layer 4 - data)

use std::fs;
use std::path::{Path, PathBuf};

use crate::data::annotator::{annotate, persist, HighlightSummary};
use crate::data::loader::PdfLoader;
use crate::domain::error::{Result, ScoreError};
use crate::domain::traits::DocumentSource;

#[derive(Debug, Default)]
pub struct HighlightUseCase {
    loader: PdfLoader,
}

impl HighlightUseCase {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn highlight_and_save(
        &self,
        path:          &Path,
        matched_terms: &[String],
        destination:   &Path,
    ) -> Result<HighlightSummary> {
        if same_file(path, destination) {
            return Err(ScoreError::annotation_write(
                destination,
                "destination is the source document",
            ));
        }

        let mut doc = self.loader.open(path)?;
        let summary = annotate(&mut doc, matched_terms)?;
        persist(&mut doc, destination)?;
        Ok(summary)
    }
}

/// True when `destination` resolves to the file at `source`.
/// `destination` need not exist yet; its parent is resolved instead.
fn same_file(source: &Path, destination: &Path) -> bool {
    let Ok(source) = fs::canonicalize(source) else {
        return false;
    };
    resolve(destination).is_some_and(|dest| dest == source)
}

fn resolve(path: &Path) -> Option<PathBuf> {
    if let Ok(resolved) = fs::canonicalize(path) {
        return Some(resolved);
    }
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    Some(fs::canonicalize(parent).ok()?.join(path.file_name()?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures;
    use crate::domain::traits::PageSource;

    #[test]
    fn test_highlight_and_save() {
        let dir    = tempfile::tempdir().unwrap();
        let source = fixtures::write_pdf(
            dir.path(),
            "cv.pdf",
            &[&["Python and SQL", "python scripting"], &["SQL tuning"]],
        );
        let out = dir.path().join("out/highlighted_cv.pdf");
        let original = std::fs::read(&source).unwrap();

        let terms   = vec!["Python".to_string(), "SQL".to_string(), "Docker".to_string()];
        let summary = HighlightUseCase::new().highlight_and_save(&source, &terms, &out).unwrap();

        assert_eq!(summary.highlights.get("Python"), Some(&2));
        assert_eq!(summary.highlights.get("SQL"), Some(&2));
        assert_eq!(summary.not_found, vec!["Docker"]);

        let saved = PdfLoader::new().open(&out).unwrap();
        assert_eq!(saved.page_count(), 2);
        assert_eq!(saved.highlight_count(0), 3);
        assert_eq!(saved.highlight_count(1), 1);
        assert_eq!(std::fs::read(&source).unwrap(), original);
    }

    #[test]
    fn test_refuses_to_overwrite_source() {
        let dir    = tempfile::tempdir().unwrap();
        let source = fixtures::write_pdf(dir.path(), "cv.pdf", &[&["Rust"]]);

        let err = HighlightUseCase::new()
            .highlight_and_save(&source, &["Rust".to_string()], &source)
            .err()
            .unwrap();
        assert!(matches!(err, ScoreError::AnnotationWrite { .. }));
    }

    #[test]
    fn test_refuses_other_spellings_of_source() {
        let dir    = tempfile::tempdir().unwrap();
        let source = fixtures::write_pdf(dir.path(), "cv.pdf", &[&["Rust"]]);
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        let original = std::fs::read(&source).unwrap();

        let dotted = dir.path().join("sub/../cv.pdf");
        let err = HighlightUseCase::new()
            .highlight_and_save(&source, &["Rust".to_string()], &dotted)
            .err()
            .unwrap();
        assert!(matches!(err, ScoreError::AnnotationWrite { .. }));

        #[cfg(unix)]
        {
            let link = dir.path().join("link.pdf");
            std::os::unix::fs::symlink(&source, &link).unwrap();
            let err = HighlightUseCase::new()
                .highlight_and_save(&source, &["Rust".to_string()], &link)
                .err()
                .unwrap();
            assert!(matches!(err, ScoreError::AnnotationWrite { .. }));
        }

        assert_eq!(std::fs::read(&source).unwrap(), original);
    }

    #[test]
    fn test_same_file_with_missing_destination() {
        let dir    = tempfile::tempdir().unwrap();
        let source = fixtures::write_pdf(dir.path(), "cv.pdf", &[&["Rust"]]);

        assert!(!same_file(&source, &dir.path().join("new.pdf")));
        assert!(!same_file(&source, &dir.path().join("absent/dir/cv.pdf")));
        assert!(!same_file(&dir.path().join("absent.pdf"), &source));
    }
}
