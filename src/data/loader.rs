// ============================================================
// Layer 4 — PDF Loader
// ============================================================
// Opens PDF files with the lopdf crate and exposes them
// through the domain traits.
//
// How a PDF page reaches us:
//   Document
//     └── Pages (page tree)
//           └── Page dictionary
//                 ├── Contents  → operator stream (content.rs)
//                 └── Annots    → annotation dictionaries
//
// Every page's content stream is decoded up front, with the
// page's fonts resolved for it (fonts.rs), so a broken
// stream fails the open with DocumentRead instead of surfacing
// half-way through scoring.
//
// Highlights are written as /Highlight annotations with
// QuadPoints, appended to the page's /Annots array.
//
// Reference: lopdf crate documentation
//            ISO 32000-1 §12.5.6.10 (Text Markup Annotations)

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use lopdf::content::Content;
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId};

use crate::data::content::page_fragments;
use crate::data::fonts::PageFonts;
use crate::domain::document::{RawFragment, Rect};
use crate::domain::error::{Result, ScoreError};
use crate::domain::traits::{DocumentSource, Highlighter, PageSource};

/// Highlight colour (RGB, 0–1): a soft yellow
const HIGHLIGHT_COLOR: [f32; 3] = [1.0, 0.92, 0.23];

/// Opens PDF files. Implements DocumentSource from Layer 3.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfLoader;

impl PdfLoader {
    pub fn new() -> Self {
        Self
    }
}

impl DocumentSource for PdfLoader {
    type Document = PdfDocument;

    fn open(&self, path: &Path) -> Result<PdfDocument> {
        if !path.is_file() {
            return Err(ScoreError::document_read(path, "file not found"));
        }

        let inner = Document::load(path).map_err(|e| ScoreError::document_read(path, e))?;
        let doc = PdfDocument::from_lopdf(path, inner)?;

        tracing::info!("Loaded '{}' with {} pages", path.display(), doc.page_count());
        Ok(doc)
    }
}

struct Page {
    id: ObjectId,
    fragments: Vec<RawFragment>,
}

/// A parsed PDF plus the fragments of every page.
pub struct PdfDocument {
    source: PathBuf,
    inner: Document,
    pages: Vec<Page>,
}

impl PdfDocument {
    /// Parse a PDF held in memory. `source` is only used in messages.
    pub fn from_bytes(source: impl Into<PathBuf>, bytes: &[u8]) -> Result<Self> {
        let source = source.into();
        let inner = Document::load_mem(bytes).map_err(|e| ScoreError::document_read(&source, e))?;
        Self::from_lopdf(source, inner)
    }

    fn from_lopdf(source: impl Into<PathBuf>, inner: Document) -> Result<Self> {
        let source = source.into();
        let mut pages = Vec::new();

        // get_pages() is keyed by 1-based page number, in order
        for (index, (number, id)) in inner.get_pages().into_iter().enumerate() {
            let bytes = inner
                .get_page_content(id)
                .map_err(|e| ScoreError::document_read(&source, format!("page {number}: {e}")))?;
            let content = Content::decode(&bytes)
                .map_err(|e| ScoreError::document_read(&source, format!("page {number}: {e}")))?;

            let fonts = PageFonts::load(&inner, id);
            let fragments = page_fragments(index, &content, &fonts);
            tracing::debug!("Page {}: {} fragments", number, fragments.len());
            pages.push(Page { id, fragments });
        }

        Ok(Self { source, inner, pages })
    }

    /// Entries of the /Info dictionary that hold text
    /// (Title, Author, Producer, CreationDate, ...).
    pub fn metadata(&self) -> BTreeMap<String, String> {
        let info: Option<&Dictionary> = match self.inner.trailer.get(b"Info") {
            Ok(Object::Reference(id)) => self.inner.get_dictionary(*id).ok(),
            Ok(Object::Dictionary(dict)) => Some(dict),
            _ => None,
        };

        info.map(|dict| {
            dict.iter()
                .filter_map(|(key, value)| {
                    let value = match value {
                        Object::String(..) => text_string(value),
                        Object::Name(name) => String::from_utf8_lossy(name).into_owned(),
                        _ => return None,
                    };
                    Some((String::from_utf8_lossy(key).into_owned(), value))
                })
                .collect()
        })
        .unwrap_or_default()
    }

    /// Annotation dictionaries attached to `page`
    fn annotations(&self, page: usize) -> Vec<&Dictionary> {
        let Some(page) = self.pages.get(page) else {
            return Vec::new();
        };
        let Ok(dict) = self.inner.get_dictionary(page.id) else {
            return Vec::new();
        };

        let annots = match dict.get(b"Annots") {
            Ok(Object::Array(items)) => items.as_slice(),
            Ok(Object::Reference(id)) => match self.inner.get_object(*id) {
                Ok(Object::Array(items)) => items.as_slice(),
                _ => return Vec::new(),
            },
            _ => return Vec::new(),
        };

        annots
            .iter()
            .filter_map(|obj| match obj {
                Object::Reference(id) => self.inner.get_dictionary(*id).ok(),
                Object::Dictionary(dict) => Some(dict),
                _ => None,
            })
            .collect()
    }

    /// Number of highlight annotations currently on `page`
    pub fn highlight_count(&self, page: usize) -> usize {
        self.annotations(page)
            .into_iter()
            .filter(|annot| has_subtype(annot, b"Highlight"))
            .count()
    }

    /// Targets of URI link annotations, in page order
    pub fn link_targets(&self) -> Vec<String> {
        (0..self.pages.len())
            .flat_map(|page| self.annotations(page))
            .filter(|annot| has_subtype(annot, b"Link"))
            .filter_map(|annot| {
                let action = match annot.get(b"A").ok()? {
                    Object::Dictionary(dict) => dict,
                    Object::Reference(id) => self.inner.get_dictionary(*id).ok()?,
                    _ => return None,
                };
                match action.get(b"URI").ok()? {
                    uri @ Object::String(..) => Some(text_string(uri)),
                    _ => None,
                }
            })
            .collect()
    }

    fn write_error(&self, reason: impl ToString) -> ScoreError {
        ScoreError::annotation_write(&self.source, reason)
    }
}

/// A PDF text string: PDFDocEncoding, or UTF-16BE / UTF-8 behind a BOM
fn text_string(obj: &Object) -> String {
    lopdf::decode_text_string(obj).unwrap_or_else(|_| match obj {
        Object::String(bytes, _) => String::from_utf8_lossy(bytes).into_owned(),
        _ => String::new(),
    })
}

fn has_subtype(annot: &Dictionary, subtype: &[u8]) -> bool {
    matches!(annot.get(b"Subtype"), Ok(Object::Name(name)) if name.as_slice() == subtype)
}

impl PageSource for PdfDocument {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn fragments(&self, page: usize) -> &[RawFragment] {
        self.pages.get(page).map(|p| p.fragments.as_slice()).unwrap_or(&[])
    }
}

impl Highlighter for PdfDocument {
    fn add_highlight(&mut self, page: usize, rect: Rect) -> Result<()> {
        let page_id = self
            .pages
            .get(page)
            .map(|p| p.id)
            .ok_or_else(|| self.write_error(format!("page {} out of range", page + 1)))?;

        let Rect { x0, y0, x1, y1 } = rect;
        let annot = dictionary! {
            "Type" => "Annot",
            "Subtype" => "Highlight",
            "Rect" => vec![x0.into(), y0.into(), x1.into(), y1.into()],
            // Upper-left, upper-right, lower-left, lower-right
            "QuadPoints" => vec![
                x0.into(), y1.into(), x1.into(), y1.into(),
                x0.into(), y0.into(), x1.into(), y0.into(),
            ],
            "C" => HIGHLIGHT_COLOR.iter().map(|&c| Object::from(c)).collect::<Vec<_>>(),
            "F" => 4,
            "P" => page_id,
        };
        let annot_id = self.inner.add_object(annot);
        let annot_ref = Object::Reference(annot_id);

        let existing = self
            .inner
            .get_dictionary(page_id)
            .map_err(|e| self.write_error(e))?
            .get(b"Annots")
            .ok()
            .cloned();

        match existing {
            // Annots stored as an indirect array
            Some(Object::Reference(array_id)) => {
                let array = self
                    .inner
                    .get_object_mut(array_id)
                    .and_then(Object::as_array_mut)
                    .map_err(|e| ScoreError::annotation_write(&self.source, e))?;
                array.push(annot_ref);
            }
            Some(Object::Array(mut items)) => {
                items.push(annot_ref);
                self.page_dict_mut(page_id)?.set("Annots", items);
            }
            _ => {
                self.page_dict_mut(page_id)?.set("Annots", vec![annot_ref]);
            }
        }

        Ok(())
    }

    fn save(&mut self, destination: &Path) -> Result<()> {
        if let Some(parent) = destination.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .map_err(|e| ScoreError::annotation_write(destination, e))?;
        }

        // Drop unreachable objects and deflate streams so the output
        // stands on its own
        self.inner.prune_objects();
        self.inner.compress();

        self.inner
            .save(destination)
            .map_err(|e| ScoreError::annotation_write(destination, e))?;

        tracing::info!("Saved annotated document to '{}'", destination.display());
        Ok(())
    }
}

impl PdfDocument {
    fn page_dict_mut(&mut self, page_id: ObjectId) -> Result<&mut Dictionary> {
        let source = self.source.clone();
        self.inner
            .get_object_mut(page_id)
            .and_then(Object::as_dict_mut)
            .map_err(|e| ScoreError::annotation_write(source, e))
    }
}
