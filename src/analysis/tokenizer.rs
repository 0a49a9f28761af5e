//! Tokenizer implementations for text analysis.
//!
//! Tokenization is the first step of the analysis pipeline: it splits raw
//! message text into word tokens. Punctuation and whitespace segments are
//! discarded, so only word-bearing tokens flow to the stemmer.
//!
//! # Examples
//!
//! ```
//! use parley::analysis::tokenizer::{Tokenizer, WordTokenizer};
//!
//! let tokenizer = WordTokenizer::new();
//! let tokens: Vec<_> = tokenizer.tokenize("Hello, world!").unwrap().collect();
//! assert_eq!(tokens.len(), 2);
//! assert_eq!(tokens[0].text, "Hello");
//! ```

use unicode_segmentation::UnicodeSegmentation;

use crate::analysis::token::{Token, TokenStream};
use crate::error::Result;

/// Trait for tokenizers that convert text into tokens.
pub trait Tokenizer: Send + Sync {
    /// Tokenize the given text into a stream of tokens.
    fn tokenize(&self, text: &str) -> Result<TokenStream>;

    /// Get the name of this tokenizer (for debugging and configuration).
    fn name(&self) -> &'static str;
}

/// A tokenizer that splits text on Unicode word boundaries (UAX #29).
///
/// Segments that contain no alphanumeric character (whitespace, punctuation
/// such as `?`, `!`, `.`, `,`) never become tokens, so downstream consumers
/// see words only.
#[derive(Clone, Debug, Default)]
pub struct WordTokenizer;

impl WordTokenizer {
    /// Create a new word tokenizer.
    pub fn new() -> Self {
        WordTokenizer
    }
}

impl Tokenizer for WordTokenizer {
    fn tokenize(&self, text: &str) -> Result<TokenStream> {
        let mut tokens = Vec::new();
        for (start_offset, word) in text.split_word_bound_indices() {
            if word.chars().any(|c| c.is_alphanumeric()) {
                let position = tokens.len();
                tokens.push(Token::with_offsets(
                    word,
                    position,
                    start_offset,
                    start_offset + word.len(),
                ));
            }
        }
        Ok(Box::new(tokens.into_iter()))
    }

    fn name(&self) -> &'static str {
        "word"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_tokenizer_basic() {
        let tokenizer = WordTokenizer::new();
        let tokens: Vec<_> = tokenizer.tokenize("Hello world").unwrap().collect();

        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].text, "Hello");
        assert_eq!(tokens[1].text, "world");
        assert_eq!(tokens[0].position, 0);
        assert_eq!(tokens[1].position, 1);
    }

    #[test]
    fn test_word_tokenizer_drops_punctuation() {
        let tokenizer = WordTokenizer::new();
        let tokens: Vec<_> = tokenizer
            .tokenize("Is anyone there? Hello!")
            .unwrap()
            .collect();

        let texts: Vec<&str> = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["Is", "anyone", "there", "Hello"]);
    }

    #[test]
    fn test_word_tokenizer_offsets() {
        let tokenizer = WordTokenizer::new();
        let tokens: Vec<_> = tokenizer.tokenize("hi, you").unwrap().collect();

        assert_eq!(tokens[0].start_offset, 0);
        assert_eq!(tokens[0].end_offset, 2);
        assert_eq!(tokens[1].start_offset, 4);
        assert_eq!(tokens[1].end_offset, 7);
    }

    #[test]
    fn test_word_tokenizer_empty_input() {
        let tokenizer = WordTokenizer::new();
        let tokens: Vec<_> = tokenizer.tokenize("").unwrap().collect();
        assert!(tokens.is_empty());

        let tokens: Vec<_> = tokenizer.tokenize("?!.,").unwrap().collect();
        assert!(tokens.is_empty());
    }

    #[test]
    fn test_word_tokenizer_contractions() {
        let tokenizer = WordTokenizer::new();
        let tokens: Vec<_> = tokenizer.tokenize("what's up").unwrap().collect();

        // UAX #29 keeps contractions as a single word
        assert_eq!(tokens[0].text, "what's");
        assert_eq!(tokens[1].text, "up");
    }
}
