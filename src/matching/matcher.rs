// ============================================================
// Layer 5 — Phrase Matcher
// ============================================================
// Scores clean text against a keyword taxonomy.
//
// Every taxonomy phrase is reduced to a canonical key: its word
// tokens (from the match model), joined by one space. So
// "Machine  Learning" and "machine-learning" are the same key.
//
// How scoring works:
//
//   text ──tokenize──▶ [t0, t1, t2, ...]
//                        │
//                        ▼
//   from every position i, walk the phrase trie along
//   t[i], t[i+1], ... until no child matches; every node
//   that ends a phrase marks that key as matched
//
// Each matched key counts once. A key in the required list
// weighs 1.0 even if it is also listed as optional.
//
// Reference: Knuth TAOCP Vol. 3 §6.3 (Digital Searching)

use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::Arc;

use crate::domain::error::Result;
use crate::domain::report::MatchResult;
use crate::domain::taxonomy::{KeywordTaxonomy, OPTIONAL_WEIGHT, REQUIRED_WEIGHT};
use crate::matching::model::MatchModel;

#[derive(Default)]
struct TrieNode {
    children: HashMap<String, usize>,
    /// Canonical key of the phrase ending here
    key: Option<String>,
}

/// Lookup structures for one taxonomy.
///
/// The key sets, the display map and the trie are built together
/// in `build` and never changed afterwards.
pub struct TaxonomyIndex {
    required_keys: HashSet<String>,
    optional_keys: HashSet<String>,
    display:       HashMap<String, String>,
    /// Keys in taxonomy order, required first, each once
    keys:          Vec<String>,
    nodes:         Vec<TrieNode>,
}

impl TaxonomyIndex {
    pub fn build(model: &MatchModel, taxonomy: &KeywordTaxonomy) -> Result<Self> {
        let mut index = Self {
            required_keys: HashSet::new(),
            optional_keys: HashSet::new(),
            display:       HashMap::new(),
            keys:          Vec::new(),
            nodes:         vec![TrieNode::default()],
        };

        for phrase in &taxonomy.required {
            if let Some(key) = index.insert(model, phrase)? {
                index.required_keys.insert(key);
            }
        }
        for phrase in &taxonomy.optional {
            if let Some(key) = index.insert(model, phrase)? {
                index.optional_keys.insert(key);
            }
        }

        tracing::debug!(
            "Indexed {} required and {} optional keys",
            index.required_keys.len(),
            index.optional_keys.len()
        );
        Ok(index)
    }

    fn insert(&mut self, model: &MatchModel, phrase: &str) -> Result<Option<String>> {
        let tokens = model.tokenize(phrase)?;
        if tokens.is_empty() {
            tracing::warn!("Ignoring taxonomy phrase '{}': no word characters", phrase);
            return Ok(None);
        }

        let key = tokens.join(" ");

        let mut node = 0;
        for token in tokens {
            node = match self.nodes[node].children.get(&token) {
                Some(&next) => next,
                None => {
                    self.nodes.push(TrieNode::default());
                    let next = self.nodes.len() - 1;
                    self.nodes[node].children.insert(token, next);
                    next
                }
            };
        }
        self.nodes[node].key = Some(key.clone());

        if !self.display.contains_key(&key) {
            self.keys.push(key.clone());
        }
        self.display.insert(key.clone(), phrase.to_string());
        Ok(Some(key))
    }

    /// Weight a matched key contributes
    pub fn weight(&self, key: &str) -> f64 {
        if self.required_keys.contains(key) {
            REQUIRED_WEIGHT
        } else if self.optional_keys.contains(key) {
            OPTIONAL_WEIGHT
        } else {
            0.0
        }
    }

    /// Taxonomy casing for `key`
    pub fn display(&self, key: &str) -> Option<&str> {
        self.display.get(key).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Keys of every phrase that occurs in `tokens`
    fn find_keys<'a>(&'a self, tokens: &[String]) -> HashSet<&'a str> {
        let mut found = HashSet::new();

        for start in 0..tokens.len() {
            let mut node = 0;
            for token in &tokens[start..] {
                let Some(&next) = self.nodes[node].children.get(token) else {
                    break;
                };
                node = next;
                if let Some(key) = &self.nodes[node].key {
                    found.insert(key.as_str());
                }
            }
        }

        found
    }

    /// Score `clean_text`, tokenized with `model`.
    /// Matched terms are reported in taxonomy casing.
    pub fn score(&self, model: &MatchModel, clean_text: &str) -> Result<MatchResult> {
        if self.is_empty() {
            return Ok(MatchResult::default());
        }

        let tokens = model.tokenize(clean_text)?;
        let found  = self.find_keys(&tokens);

        // Summing an empty f64 iterator yields -0.0
        let score = found.iter().fold(0.0, |acc, key| acc + self.weight(key));
        let matched = found
            .iter()
            .filter_map(|key| self.display(key))
            .map(str::to_string)
            .collect();

        Ok(MatchResult { score, matched })
    }

    /// Taxonomy phrases (display casing) that `result` did not match
    pub fn missing(&self, result: &MatchResult) -> BTreeSet<String> {
        self.keys
            .iter()
            .filter_map(|key| self.display(key))
            .filter(|display| !result.matched.contains(*display))
            .map(str::to_string)
            .collect()
    }
}

/// A taxonomy prepared for repeated scoring with one shared model.
pub struct PhraseMatcher {
    model: Arc<MatchModel>,
    index: TaxonomyIndex,
}

impl PhraseMatcher {
    pub fn new(model: Arc<MatchModel>, taxonomy: &KeywordTaxonomy) -> Result<Self> {
        let index = TaxonomyIndex::build(&model, taxonomy)?;
        Ok(Self { model, index })
    }

    pub fn score(&self, clean_text: &str) -> Result<MatchResult> {
        self.index.score(&self.model, clean_text)
    }

    pub fn missing(&self, result: &MatchResult) -> BTreeSet<String> {
        self.index.missing(result)
    }
}

/// One-shot scoring of `clean_text` against the two phrase lists.
pub fn score(
    clean_text: &str,
    required:   &[String],
    optional:   &[String],
    model:      &MatchModel,
) -> Result<MatchResult> {
    let taxonomy = KeywordTaxonomy::new(required.to_vec(), optional.to_vec());
    TaxonomyIndex::build(model, &taxonomy)?.score(model, clean_text)
}
