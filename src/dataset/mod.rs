//! Intent dataset loading and validation.
//!
//! The dataset is a JSON document with a single `intents` array. Each intent
//! carries a unique tag, the example patterns users might type, and the
//! canned responses the bot may answer with:
//!
//! ```json
//! {
//!   "intents": [
//!     {
//!       "tag": "greeting",
//!       "patterns": ["Hi", "Hello", "Is anyone there?"],
//!       "responses": ["Hello!", "Hi there, how can I help?"]
//!     }
//!   ]
//! }
//! ```
//!
//! Loading validates the structure and fails fast: a catalog that parses but
//! is unusable (no intents, empty tags, missing patterns or responses,
//! duplicate tags) never reaches the trainer or the chat engine.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ParleyError, Result};

/// A labeled category of user message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Intent {
    /// Unique identifier for this intent.
    pub tag: String,
    /// Example phrasings that belong to this intent.
    pub patterns: Vec<String>,
    /// Candidate responses; one is chosen at random when the intent matches.
    pub responses: Vec<String>,
}

/// The full set of intents the bot understands. Immutable once loaded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntentCatalog {
    intents: Vec<Intent>,
}

impl IntentCatalog {
    /// Build a catalog from intent records, validating them.
    pub fn from_intents(intents: Vec<Intent>) -> Result<Self> {
        let catalog = IntentCatalog { intents };
        catalog.validate()?;
        Ok(catalog)
    }

    /// Load and validate a catalog from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            ParleyError::dataset(format!("cannot read {}: {e}", path.display()))
        })?;
        let catalog: IntentCatalog = serde_json::from_str(&content)?;
        catalog.validate()?;
        Ok(catalog)
    }

    fn validate(&self) -> Result<()> {
        if self.intents.is_empty() {
            return Err(ParleyError::dataset("catalog contains no intents"));
        }

        let mut seen = HashSet::new();
        for intent in &self.intents {
            if intent.tag.trim().is_empty() {
                return Err(ParleyError::dataset("intent has an empty tag"));
            }
            if !seen.insert(intent.tag.as_str()) {
                return Err(ParleyError::dataset(format!(
                    "duplicate intent tag '{}'",
                    intent.tag
                )));
            }
            if intent.patterns.is_empty() {
                return Err(ParleyError::dataset(format!(
                    "intent '{}' has no patterns",
                    intent.tag
                )));
            }
            if intent.responses.is_empty() {
                return Err(ParleyError::dataset(format!(
                    "intent '{}' has no responses",
                    intent.tag
                )));
            }
        }

        Ok(())
    }

    /// All intent records.
    pub fn intents(&self) -> &[Intent] {
        &self.intents
    }

    /// Tags of all intents, sorted lexicographically.
    ///
    /// Index positions in this list are the class labels of the classifier
    /// and must match between training and inference.
    pub fn tags(&self) -> Vec<String> {
        let mut tags: Vec<String> = self.intents.iter().map(|i| i.tag.clone()).collect();
        tags.sort();
        tags
    }

    /// Candidate responses for the given tag, if the tag exists.
    pub fn responses_for(&self, tag: &str) -> Option<&[String]> {
        self.intents
            .iter()
            .find(|i| i.tag == tag)
            .map(|i| i.responses.as_slice())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn intent(tag: &str, patterns: &[&str], responses: &[&str]) -> Intent {
        Intent {
            tag: tag.to_string(),
            patterns: patterns.iter().map(|s| s.to_string()).collect(),
            responses: responses.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_catalog_from_json() {
        let json = r#"
        {
            "intents": [
                {
                    "tag": "greeting",
                    "patterns": ["Hi", "Hello"],
                    "responses": ["Hello!"]
                }
            ]
        }
        "#;

        let catalog: IntentCatalog = serde_json::from_str(json).unwrap();
        assert_eq!(catalog.intents().len(), 1);
        assert_eq!(catalog.intents()[0].tag, "greeting");
    }

    #[test]
    fn test_empty_catalog_rejected() {
        let result = IntentCatalog::from_intents(vec![]);
        assert!(matches!(result, Err(ParleyError::Dataset(_))));
    }

    #[test]
    fn test_missing_patterns_rejected() {
        let result = IntentCatalog::from_intents(vec![intent("greeting", &[], &["Hello!"])]);
        assert!(matches!(result, Err(ParleyError::Dataset(_))));
    }

    #[test]
    fn test_missing_responses_rejected() {
        let result = IntentCatalog::from_intents(vec![intent("greeting", &["Hi"], &[])]);
        assert!(matches!(result, Err(ParleyError::Dataset(_))));
    }

    #[test]
    fn test_duplicate_tags_rejected() {
        let result = IntentCatalog::from_intents(vec![
            intent("greeting", &["Hi"], &["Hello!"]),
            intent("greeting", &["Hey"], &["Hey there!"]),
        ]);
        assert!(matches!(result, Err(ParleyError::Dataset(_))));
    }

    #[test]
    fn test_tags_sorted() {
        let catalog = IntentCatalog::from_intents(vec![
            intent("thanks", &["Thanks"], &["You're welcome"]),
            intent("greeting", &["Hi"], &["Hello!"]),
            intent("goodbye", &["Bye"], &["See you later"]),
        ])
        .unwrap();

        assert_eq!(catalog.tags(), vec!["goodbye", "greeting", "thanks"]);
    }

    #[test]
    fn test_responses_for() {
        let catalog = IntentCatalog::from_intents(vec![
            intent("greeting", &["Hi"], &["Hello!", "Hi there!"]),
        ])
        .unwrap();

        assert_eq!(
            catalog.responses_for("greeting"),
            Some(&["Hello!".to_string(), "Hi there!".to_string()][..])
        );
        assert_eq!(catalog.responses_for("unknown"), None);
    }
}
