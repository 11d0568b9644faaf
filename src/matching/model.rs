// ============================================================
// Layer 5 — Match Model
// ============================================================
// The model decides what a "word" is. Both the taxonomy phrases
// and the document text go through the same model, so a phrase
// and its occurrence always split into the same tokens.
//
// Two sources:
//
//   BuiltIn            — the tokenizers Whitespace pre-tokenizer
//                        (\w+|[^\w\s]+), nothing on disk
//   TokenizerFile(p)   — a HuggingFace tokenizer.json; its
//                        normalizer and pre-tokenizer run first
//
// Only word tokens survive: maximal runs of letters, digits and
// underscores, lowercased. Punctuation never takes part in a
// match.
//
// ModelHandle loads the model lazily, once, and hands every
// caller the same Arc. It is passed to the matcher explicitly;
// there is no process-wide static.
//
// Reference: HuggingFace tokenizers — Pre-tokenization
//            std::sync::OnceLock

use std::path::PathBuf;
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use tokenizers::pre_tokenizers::whitespace::Whitespace;
use tokenizers::{Normalizer, OffsetReferential, OffsetType, PreTokenizedString, PreTokenizer, Tokenizer};

use crate::domain::error::{Result, ScoreError};
use crate::infra::tokenizer_store::TokenizerStore;

/// Where the match model comes from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ModelSource {
    #[default]
    BuiltIn,
    TokenizerFile(PathBuf),
}

/// Splits text into lowercase word tokens.
pub struct MatchModel {
    tokenizer: Option<Tokenizer>,
    fallback:  Whitespace,
}

impl MatchModel {
    /// Model backed by the Whitespace pre-tokenizer alone
    pub fn builtin() -> Self {
        Self { tokenizer: None, fallback: Whitespace::default() }
    }

    /// Model backed by a loaded tokenizer's normalizer and pre-tokenizer
    pub fn from_tokenizer(tokenizer: Tokenizer) -> Self {
        Self { tokenizer: Some(tokenizer), fallback: Whitespace::default() }
    }

    /// Build the model described by `source`
    pub fn load(source: &ModelSource) -> Result<Self> {
        match source {
            ModelSource::BuiltIn => Ok(Self::builtin()),
            ModelSource::TokenizerFile(path) => {
                let tokenizer = TokenizerStore::load(path)?;
                Ok(Self::from_tokenizer(tokenizer))
            }
        }
    }

    /// Lowercase word tokens of `text`, in order
    pub fn tokenize(&self, text: &str) -> Result<Vec<String>> {
        let mut pre = PreTokenizedString::from(text);

        let normalizer    = self.tokenizer.as_ref().and_then(|t| t.get_normalizer());
        let pre_tokenizer = self.tokenizer.as_ref().and_then(|t| t.get_pre_tokenizer());

        if let Some(normalizer) = normalizer {
            pre.normalize(|s| normalizer.normalize(s))
                .map_err(|e| ScoreError::Tokenization(e.to_string()))?;
        }

        let split = match pre_tokenizer {
            Some(p) => p.pre_tokenize(&mut pre),
            None    => self.fallback.pre_tokenize(&mut pre),
        };
        split.map_err(|e| ScoreError::Tokenization(e.to_string()))?;

        let tokens = pre
            .get_splits(OffsetReferential::Normalized, OffsetType::Byte)
            .into_iter()
            .flat_map(|(split, _, _)| split.split(|c: char| !is_word_char(c)))
            .filter(|word| !word.is_empty())
            .map(str::to_lowercase)
            .collect();

        Ok(tokens)
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Lazily loaded, shared match model.
///
/// `get()` is safe to call from many threads at once: the first
/// callers race on a mutex, exactly one of them loads, and all of
/// them receive the same `Arc`. A failed load is not cached, so a
/// later call retries.
pub struct ModelHandle {
    source: ModelSource,
    cell:   OnceLock<Arc<MatchModel>>,
    init:   Mutex<()>,
}

impl ModelHandle {
    pub fn new(source: ModelSource) -> Self {
        Self { source, cell: OnceLock::new(), init: Mutex::new(()) }
    }

    pub fn is_loaded(&self) -> bool {
        self.cell.get().is_some()
    }

    pub fn get(&self) -> Result<Arc<MatchModel>> {
        if let Some(model) = self.cell.get() {
            return Ok(Arc::clone(model));
        }

        // A panic in another loader leaves nothing half-built behind
        // the lock, so a poisoned guard is still usable
        let _guard = self.init.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(model) = self.cell.get() {
            return Ok(Arc::clone(model));
        }

        tracing::info!("Loading match model ({:?})", self.source);
        let model = Arc::new(MatchModel::load(&self.source)?);
        let _ = self.cell.set(Arc::clone(&model));
        Ok(model)
    }
}

impl Default for ModelHandle {
    fn default() -> Self {
        Self::new(ModelSource::BuiltIn)
    }
}
