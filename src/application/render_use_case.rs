// ============================================================
// Layer 2 — RenderUseCase
// ============================================================
// Shows the text the scorer sees: the markdown-like rendering of
// a PDF, or that rendering after normalization.

use std::path::Path;

use crate::data::loader::PdfLoader;
use crate::data::preprocessor::Preprocessor;
use crate::data::structurer::{render_to_text, structure};
use crate::domain::error::Result;
use crate::domain::traits::DocumentSource;

#[derive(Debug, Default)]
pub struct RenderUseCase {
    loader:       PdfLoader,
    preprocessor: Preprocessor,
}

impl RenderUseCase {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn render(&self, path: &Path, normalized: bool) -> Result<String> {
        let doc  = self.loader.open(path)?;
        let text = render_to_text(&structure(&doc));

        if normalized {
            Ok(self.preprocessor.normalize(&text))
        } else {
            Ok(text)
        }
    }
}
