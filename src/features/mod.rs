//! Bag-of-words feature extraction.
//!
//! Messages are encoded as fixed-length presence vectors over a vocabulary of
//! word stems: entry `i` is 1.0 when vocabulary word `i` appears among the
//! stems of the input, else 0.0. Word order and repetition do not matter.

use std::collections::{BTreeSet, HashMap};

use crate::analysis::TextPipeline;
use crate::dataset::IntentCatalog;
use crate::error::{ParleyError, Result};

/// Punctuation tokens excluded from the vocabulary.
const IGNORE_TOKENS: &[&str] = &["?", "!", ".", ","];

/// Bag-of-words encoder over a fixed vocabulary.
///
/// The vocabulary is sorted and deduplicated; index positions are the feature
/// dimensions of the classifier and must match between training and
/// inference, so the word list is persisted verbatim in the model artifact
/// and fed back through [`BagOfWordsEncoder::from_words`] at load time.
#[derive(Debug, Clone)]
pub struct BagOfWordsEncoder {
    /// Sorted, deduplicated word stems.
    words: Vec<String>,
    /// Stem -> feature index.
    index: HashMap<String, usize>,
}

impl BagOfWordsEncoder {
    /// Build the vocabulary from every pattern in the catalog.
    ///
    /// Each pattern is tokenized and stemmed through the pipeline; stems are
    /// collected across all intents, punctuation dropped, deduplicated, and
    /// sorted lexicographically.
    pub fn fit(catalog: &IntentCatalog, pipeline: &TextPipeline) -> Result<Self> {
        let mut stems = BTreeSet::new();
        for intent in catalog.intents() {
            for pattern in &intent.patterns {
                for stem in pipeline.stems(pattern)? {
                    if !IGNORE_TOKENS.contains(&stem.as_str()) {
                        stems.insert(stem);
                    }
                }
            }
        }

        if stems.is_empty() {
            return Err(ParleyError::dataset(
                "no vocabulary words found in any pattern",
            ));
        }

        Ok(Self::from_words(stems.into_iter().collect()))
    }

    /// Reconstruct an encoder from a persisted word list.
    pub fn from_words(words: Vec<String>) -> Self {
        let index = words
            .iter()
            .enumerate()
            .map(|(i, w)| (w.clone(), i))
            .collect();
        BagOfWordsEncoder { words, index }
    }

    /// Encode stemmed words into a presence vector of length [`Self::len`].
    pub fn encode(&self, stems: &[String]) -> Vec<f32> {
        let mut bag = vec![0.0; self.words.len()];
        for stem in stems {
            if let Some(&i) = self.index.get(stem) {
                bag[i] = 1.0;
            }
        }
        bag
    }

    /// The vocabulary, in feature-index order.
    pub fn words(&self) -> &[String] {
        &self.words
    }

    /// Number of feature dimensions.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Check if the vocabulary is empty.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}
