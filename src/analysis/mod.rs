//! Text analysis pipeline for Parley.
//!
//! Raw message text is processed in two stages before feature encoding:
//!
//! ```text
//! Raw Text → Tokenizer → Stemmer → word stems
//! ```
//!
//! The same pipeline runs at training time (vocabulary building) and at
//! inference time (message encoding), so stems line up with vocabulary
//! entries in both directions.
//!
//! # Examples
//!
//! ```
//! use parley::analysis::TextPipeline;
//!
//! let pipeline = TextPipeline::new();
//! let stems = pipeline.stems("Is anyone there?").unwrap();
//! assert_eq!(stems, vec!["is", "anyon", "there"]);
//! ```

pub mod stemmer;
pub mod token;
pub mod tokenizer;

pub use stemmer::{PorterStemmer, Stemmer};
pub use token::{Token, TokenStream};
pub use tokenizer::{Tokenizer, WordTokenizer};

use crate::error::Result;

/// Tokenizer and stemmer composed into a single preprocessing step.
pub struct TextPipeline {
    tokenizer: Box<dyn Tokenizer>,
    stemmer: Box<dyn Stemmer>,
}

impl std::fmt::Debug for TextPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextPipeline")
            .field("tokenizer", &self.tokenizer.name())
            .field("stemmer", &self.stemmer.name())
            .finish()
    }
}

impl TextPipeline {
    /// Create the default pipeline: Unicode word tokenization + Porter stemming.
    pub fn new() -> Self {
        TextPipeline {
            tokenizer: Box::new(WordTokenizer::new()),
            stemmer: Box::new(PorterStemmer::new()),
        }
    }

    /// Create a pipeline with a custom tokenizer and stemmer.
    pub fn with_parts(tokenizer: Box<dyn Tokenizer>, stemmer: Box<dyn Stemmer>) -> Self {
        TextPipeline { tokenizer, stemmer }
    }

    /// Tokenize the text into words.
    pub fn tokenize(&self, text: &str) -> Result<TokenStream> {
        self.tokenizer.tokenize(text)
    }

    /// Tokenize the text and stem each word, preserving order.
    pub fn stems(&self, text: &str) -> Result<Vec<String>> {
        let stems = self
            .tokenize(text)?
            .map(|token| self.stemmer.stem(&token.text))
            .collect();
        Ok(stems)
    }
}

impl Default for TextPipeline {
    fn default() -> Self {
        Self::new()
    }
}
