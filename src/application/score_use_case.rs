// ============================================================
// Layer 2 — ScoreUseCase
// ============================================================
// Orchestrates the scoring pipeline for one or more resumes:
//
//   Step 1: Open the PDF                  (Layer 4 - data)
//   Step 2: Structure the fragments       (Layer 4 - data)
//   Step 3: Render markdown-like text     (Layer 4 - data)
//   Step 4: Normalize the text            (Layer 4 - data)
//   Step 5: Match against the taxonomy    (Layer 5 - matching)
//   Step 6: Build the score report        (Layer 3 - domain)
//
// The taxonomy is read once, when the use case is built, and
// indexed once. Every document after that reuses the index, so
// scoring many files in parallel shares one matcher.
//
// Reference: Rust Book §13 (Iterators and Closures)
//            rayon crate documentation

use std::path::{Path, PathBuf};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::data::{
    loader::PdfLoader,
    preprocessor::Preprocessor,
    structurer::{render_to_text, structure},
};
use crate::domain::error::Result;
use crate::domain::report::ScoreReport;
use crate::domain::taxonomy::KeywordTaxonomy;
use crate::domain::traits::{DocumentSource, PageSource};
use crate::infra::taxonomy_store::{TaxonomyStore, DEFAULT_TAXONOMY_FILE};
use crate::matching::matcher::PhraseMatcher;
use crate::matching::model::{ModelHandle, ModelSource};

// ─── Scoring Configuration ───────────────────────────────────────────────────
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreConfig {
    pub taxonomy_path:  PathBuf,
    /// Score against an empty taxonomy when the file cannot be read
    pub lenient:        bool,
    /// None selects the built-in match model
    pub tokenizer_path: Option<PathBuf>,
    pub out_dir:        PathBuf,
    pub highlight:      bool,
}

impl Default for ScoreConfig {
    fn default() -> Self {
        Self {
            taxonomy_path:  PathBuf::from(DEFAULT_TAXONOMY_FILE),
            lenient:        true,
            tokenizer_path: None,
            out_dir:        PathBuf::from("highlighted"),
            highlight:      false,
        }
    }
}

impl ScoreConfig {
    pub fn model_source(&self) -> ModelSource {
        match &self.tokenizer_path {
            Some(path) => ModelSource::TokenizerFile(path.clone()),
            None       => ModelSource::BuiltIn,
        }
    }
}

// ─── ScoreUseCase ─────────────────────────────────────────────────────────────
pub struct ScoreUseCase {
    taxonomy:     KeywordTaxonomy,
    matcher:      PhraseMatcher,
    preprocessor: Preprocessor,
    loader:       PdfLoader,
}

impl ScoreUseCase {
    /// Load the taxonomy named by `config` and the configured model.
    pub fn new(config: &ScoreConfig) -> Result<Self> {
        let taxonomy = if config.lenient {
            TaxonomyStore::load_or_empty(&config.taxonomy_path)
        } else {
            TaxonomyStore::load(&config.taxonomy_path)?
        };
        let handle = ModelHandle::new(config.model_source());
        Self::with_taxonomy(taxonomy, &handle)
    }

    /// Build from an already loaded taxonomy and a shared model handle.
    pub fn with_taxonomy(taxonomy: KeywordTaxonomy, handle: &ModelHandle) -> Result<Self> {
        let model   = handle.get()?;
        let matcher = PhraseMatcher::new(model, &taxonomy)?;
        Ok(Self {
            taxonomy,
            matcher,
            preprocessor: Preprocessor::new(),
            loader:       PdfLoader::new(),
        })
    }

    pub fn taxonomy(&self) -> &KeywordTaxonomy {
        &self.taxonomy
    }

    /// Score one PDF file.
    pub fn score_document(&self, path: &Path) -> Result<ScoreReport> {
        self.score_document_with(&self.loader, path)
    }

    /// Score one document opened through any DocumentSource.
    pub fn score_document_with<S: DocumentSource>(&self, source: &S, path: &Path) -> Result<ScoreReport> {
        let doc = source.open(path)?;
        self.score_pages(&doc, &path.display().to_string())
    }

    /// Score the pages of an open document.
    pub fn score_pages(&self, doc: &impl PageSource, source_name: &str) -> Result<ScoreReport> {
        // ── Step 2-3: Structure and render ─────────────────────────────────────
        let lines    = structure(doc);
        let markdown = render_to_text(&lines);

        // ── Step 4: Normalize ──────────────────────────────────────────────────
        let clean = self.preprocessor.normalize(&markdown);
        tracing::debug!("{}: {} lines, {} clean chars", source_name, lines.len(), clean.len());

        // ── Step 5: Match ──────────────────────────────────────────────────────
        let result = self.matcher.score(&clean)?;

        // ── Step 6: Report ─────────────────────────────────────────────────────
        let report = ScoreReport {
            source:        source_name.to_string(),
            score:         result.score,
            max_score:     self.taxonomy.max_score(),
            missing_terms: self.matcher.missing(&result),
            matched_terms: result.matched,
        };

        tracing::info!(
            "Scored '{}': {:.1}/{:.1} ({:.0}%)",
            report.source,
            report.score,
            report.max_score,
            report.percentage()
        );
        Ok(report)
    }

    /// Score many files in parallel. Results come back in input order;
    /// one unreadable file does not stop the others.
    pub fn score_documents(&self, paths: &[PathBuf]) -> Vec<(PathBuf, Result<ScoreReport>)> {
        paths
            .par_iter()
            .map(|path| (path.clone(), self.score_document(path)))
            .collect()
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    use crate::data::fixtures;
    use crate::domain::error::ScoreError;

    fn use_case(required: &[&str], optional: &[&str]) -> ScoreUseCase {
        let taxonomy = KeywordTaxonomy::new(required.to_vec(), optional.to_vec());
        ScoreUseCase::with_taxonomy(taxonomy, &ModelHandle::default()).unwrap()
    }

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_score_document_end_to_end() {
        let dir  = tempfile::tempdir().unwrap();
        let path = fixtures::write_pdf(
            dir.path(),
            "jane.pdf",
            &[&["SKILLS", "• Python, SQL and Machine Learning"], &["Hobbies: chess"]],
        );

        let scorer = use_case(&["Python", "SQL"], &["Docker", "machine learning"]);
        let report = scorer.score_document(&path).unwrap();

        assert_eq!(report.score, 2.5);
        assert_eq!(report.max_score, 3.0);
        assert_eq!(report.matched_terms, set(&["Python", "SQL", "machine learning"]));
        assert_eq!(report.missing_terms, set(&["Docker"]));
        assert!(report.percentage() > 83.0 && report.percentage() < 84.0);
    }

    #[test]
    fn test_uppercase_heading_still_matches() {
        let dir  = tempfile::tempdir().unwrap();
        let path = fixtures::write_pdf(dir.path(), "cv.pdf", &[&["KUBERNETES EXPERT"]]);

        let report = use_case(&["kubernetes"], &[]).score_document(&path).unwrap();
        assert_eq!(report.score, 1.0);
    }

    #[test]
    fn test_empty_taxonomy_reports_zero_percent() {
        let dir  = tempfile::tempdir().unwrap();
        let path = fixtures::write_pdf(dir.path(), "cv.pdf", &[&["Anything"]]);

        let report = use_case(&[], &[]).score_document(&path).unwrap();
        assert_eq!(report.max_score, 0.0);
        assert_eq!(report.percentage(), 0.0);
    }

    #[test]
    fn test_no_match_report_serializes_positive_zero() {
        let dir  = tempfile::tempdir().unwrap();
        let path = fixtures::write_pdf(dir.path(), "cv.pdf", &[&["i like rust"]]);

        let report = use_case(&["python"], &["docker"]).score_document(&path).unwrap();
        assert!(!report.score.is_sign_negative());
        assert!(!report.percentage().is_sign_negative());

        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains(r#""score":0.0"#), "json: {json}");
    }

    #[test]
    fn test_embedded_font_text_is_scored() {
        let dir  = tempfile::tempdir().unwrap();
        let cid  = fixtures::font_document(
            |doc| fixtures::type0_font(doc, "Python", &[600, 480, 310, 500, 520, 530]),
            &[fixtures::glyph_ids(6)],
        );
        let tex  = fixtures::font_document(fixtures::differences_font, &[b"\x0Cnance".to_vec()]);
        let cid  = fixtures::write_document(dir.path(), "cid.pdf", cid);
        let tex  = fixtures::write_document(dir.path(), "tex.pdf", tex);

        let scorer = use_case(&["Python"], &["finance"]);
        assert_eq!(scorer.score_document(&cid).unwrap().matched_terms, set(&["Python"]));
        assert_eq!(scorer.score_document(&tex).unwrap().matched_terms, set(&["finance"]));
    }

    #[test]
    fn test_missing_document_is_document_read() {
        let err = use_case(&["x"], &[]).score_document(Path::new("/nonexistent.pdf")).err().unwrap();
        assert!(matches!(err, ScoreError::DocumentRead { .. }));
    }

    #[test]
    fn test_strict_config_rejects_missing_taxonomy() {
        let config = ScoreConfig {
            taxonomy_path: PathBuf::from("/nonexistent/config.json"),
            lenient:       false,
            ..Default::default()
        };
        assert!(matches!(ScoreUseCase::new(&config), Err(ScoreError::Config { .. })));
    }

    #[test]
    fn test_lenient_config_scores_against_empty_taxonomy() {
        let config = ScoreConfig {
            taxonomy_path: PathBuf::from("/nonexistent/config.json"),
            ..Default::default()
        };
        let scorer = ScoreUseCase::new(&config).unwrap();
        assert!(scorer.taxonomy().is_empty());
    }

    #[test]
    fn test_unavailable_model_fails_construction() {
        let config = ScoreConfig {
            tokenizer_path: Some(PathBuf::from("/nonexistent/tokenizer.json")),
            ..Default::default()
        };
        assert!(matches!(ScoreUseCase::new(&config), Err(ScoreError::ModelUnavailable { .. })));
    }

    #[test]
    fn test_score_documents_keeps_order_and_isolates_failures() {
        let dir  = tempfile::tempdir().unwrap();
        let good = fixtures::write_pdf(dir.path(), "a.pdf", &[&["Rust"]]);
        let bad  = dir.path().join("missing.pdf");
        let also = fixtures::write_pdf(dir.path(), "b.pdf", &[&["Go"]]);

        let scorer  = use_case(&["Rust"], &["Go"]);
        let results = scorer.score_documents(&[good.clone(), bad.clone(), also.clone()]);

        assert_eq!(results.len(), 3);
        assert_eq!(results[0].0, good);
        assert_eq!(results[0].1.as_ref().unwrap().score, 1.0);
        assert_eq!(results[1].0, bad);
        assert!(results[1].1.is_err());
        assert_eq!(results[2].1.as_ref().unwrap().score, 0.5);
    }
}
