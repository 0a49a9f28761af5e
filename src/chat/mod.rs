//! Chat engine: confidence-thresholded intent inference.
//!
//! The engine is the immutable serving context built once at startup from a
//! model artifact and the intent catalog it was trained on. Construction
//! fails on any inconsistency (missing artifact, dimension mismatch, tags
//! absent from the catalog); a constructed engine is always ready to answer.
//!
//! Per request, the message is stemmed and encoded against the artifact's
//! vocabulary, pushed through the network, and softmaxed. When the best
//! class clears the confidence threshold, one of the matching intent's
//! responses is chosen at random; otherwise a fixed fallback message is
//! returned. Low confidence and empty input are ordinary responses, never
//! errors.

use std::path::Path;

use parking_lot::Mutex;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

use crate::analysis::TextPipeline;
use crate::dataset::IntentCatalog;
use crate::error::{ParleyError, Result};
use crate::features::BagOfWordsEncoder;
use crate::model::ModelArtifact;
use crate::nn::network::{IntentNetwork, softmax};

/// Serving configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Minimum predicted-class probability required to answer with an intent.
    pub confidence_threshold: f32,
    /// Reply used when no class clears the threshold.
    pub fallback_response: String,
    /// Reply used when the message is empty or absent.
    pub empty_message_response: String,
    /// Seed for response sampling; `None` draws from the OS.
    pub seed: Option<u64>,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: 0.75,
            fallback_response: "I do not understand...".to_string(),
            empty_message_response: "No message received.".to_string(),
            seed: None,
        }
    }
}

/// The predicted tag and its softmax probability.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub tag: String,
    pub confidence: f32,
}

/// Intent classifier plus response selection, ready to serve.
///
/// All state except the sampling RNG is read-only after construction, so any
/// number of concurrent [`ChatEngine::respond`] calls may run in parallel.
pub struct ChatEngine {
    network: IntentNetwork,
    encoder: BagOfWordsEncoder,
    tags: Vec<String>,
    catalog: IntentCatalog,
    pipeline: TextPipeline,
    config: ChatConfig,
    rng: Mutex<StdRng>,
}

impl std::fmt::Debug for ChatEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatEngine")
            .field("vocabulary_size", &self.encoder.len())
            .field("tags", &self.tags)
            .field("confidence_threshold", &self.config.confidence_threshold)
            .finish()
    }
}

impl ChatEngine {
    /// Build an engine from a loaded artifact and the matching catalog.
    ///
    /// Every tag the model predicts must exist in the catalog; otherwise a
    /// confident prediction would have no responses to draw from, so the
    /// mismatch is rejected here rather than at request time.
    pub fn new(
        artifact: ModelArtifact,
        catalog: IntentCatalog,
        config: ChatConfig,
    ) -> Result<Self> {
        let (network, vocabulary, tags) = artifact.into_network()?;

        for tag in &tags {
            if catalog.responses_for(tag).is_none() {
                return Err(ParleyError::model(format!(
                    "model tag '{tag}' does not exist in the dataset"
                )));
            }
        }

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        log::debug!(
            "chat engine ready: {} tags, vocabulary of {} stems",
            tags.len(),
            network.input_size()
        );

        Ok(ChatEngine {
            network,
            encoder: BagOfWordsEncoder::from_words(vocabulary),
            tags,
            catalog,
            pipeline: TextPipeline::new(),
            config,
            rng: Mutex::new(rng),
        })
    }

    /// Load the artifact and catalog from disk and build an engine.
    pub fn open(model_path: &Path, dataset_path: &Path, config: ChatConfig) -> Result<Self> {
        let artifact = ModelArtifact::load(model_path)?;
        let catalog = IntentCatalog::load(dataset_path)?;
        Self::new(artifact, catalog, config)
    }

    /// Classify a message into the most probable tag.
    pub fn classify(&self, message: &str) -> Result<Prediction> {
        let stems = self.pipeline.stems(message)?;
        let features = self.encoder.encode(&stems);
        let probabilities = softmax(&self.network.forward(&features));

        let (best, confidence) = probabilities
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .ok_or_else(|| ParleyError::model("network produced no output"))?;

        Ok(Prediction {
            tag: self.tags[best].clone(),
            confidence: *confidence,
        })
    }

    /// Answer a message.
    ///
    /// An absent or blank message yields the configured no-message reply
    /// without touching the network. A prediction below the confidence
    /// threshold yields the fallback reply.
    pub fn respond(&self, message: Option<&str>) -> Result<String> {
        let raw = match message {
            Some(m) if !m.trim().is_empty() => m,
            _ => return Ok(self.config.empty_message_response.clone()),
        };

        let prediction = self.classify(raw)?;
        if prediction.confidence < self.config.confidence_threshold {
            return Ok(self.config.fallback_response.clone());
        }

        let responses = self
            .catalog
            .responses_for(&prediction.tag)
            .ok_or_else(|| {
                ParleyError::model(format!(
                    "tag '{}' vanished from the dataset",
                    prediction.tag
                ))
            })?;
        let choice = responses
            .choose(&mut *self.rng.lock())
            .ok_or_else(|| {
                ParleyError::model(format!("tag '{}' has no responses", prediction.tag))
            })?;

        Ok(choice.clone())
    }

    /// Tags this engine can predict, in class-label order.
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// The active configuration.
    pub fn config(&self) -> &ChatConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::dataset::Intent;
    use crate::model::ArtifactMetadata;
    use crate::nn::network::Linear;

    fn catalog() -> IntentCatalog {
        IntentCatalog::from_intents(vec![
            Intent {
                tag: "goodbye".to_string(),
                patterns: vec!["Bye".to_string()],
                responses: vec!["See you later!".to_string()],
            },
            Intent {
                tag: "greeting".to_string(),
                patterns: vec!["Hello".to_string()],
                responses: vec!["Hello!".to_string(), "Hi there!".to_string()],
            },
        ])
        .unwrap()
    }

    fn metadata() -> ArtifactMetadata {
        ArtifactMetadata {
            trained_at: Utc::now(),
            training_examples: 2,
            final_loss: 0.0,
        }
    }

    /// Engine whose network always outputs zero logits, i.e. a uniform
    /// distribution over two tags (confidence 0.5).
    fn uncertain_engine(config: ChatConfig) -> ChatEngine {
        let zeros = |n: usize, m: usize| Linear::from_parts(vec![0.0; n * m], vec![0.0; m], n, m);
        let network = IntentNetwork::from_layers(
            zeros(2, 8).unwrap(),
            zeros(8, 8).unwrap(),
            zeros(8, 2).unwrap(),
        )
        .unwrap();
        let artifact = ModelArtifact::from_network(
            &network,
            vec!["bye".to_string(), "hello".to_string()],
            vec!["goodbye".to_string(), "greeting".to_string()],
            metadata(),
        );

        ChatEngine::new(artifact, catalog(), config).unwrap()
    }

    #[test]
    fn test_empty_and_absent_messages() {
        let engine = uncertain_engine(ChatConfig::default());

        assert_eq!(engine.respond(None).unwrap(), "No message received.");
        assert_eq!(engine.respond(Some("")).unwrap(), "No message received.");
        assert_eq!(engine.respond(Some("   ")).unwrap(), "No message received.");
    }

    #[test]
    fn test_low_confidence_falls_back() {
        let engine = uncertain_engine(ChatConfig::default());

        // Uniform softmax over two classes never reaches 0.75.
        assert_eq!(
            engine.respond(Some("hello")).unwrap(),
            "I do not understand..."
        );
    }

    #[test]
    fn test_threshold_is_configurable() {
        let engine = uncertain_engine(ChatConfig {
            confidence_threshold: 0.4,
            ..ChatConfig::default()
        });

        let reply = engine.respond(Some("hello")).unwrap();
        assert_ne!(reply, "I do not understand...");
    }

    #[test]
    fn test_unknown_model_tag_rejected() {
        let mut rng = StdRng::seed_from_u64(5);
        let network = IntentNetwork::new(1, 8, 1, &mut rng);
        let artifact = ModelArtifact::from_network(
            &network,
            vec!["hello".to_string()],
            vec!["missing".to_string()],
            metadata(),
        );

        let result = ChatEngine::new(artifact, catalog(), ChatConfig::default());
        assert!(matches!(result, Err(ParleyError::Model(_))));
    }

    #[test]
    fn test_seeded_response_sampling_is_reproducible() {
        let config = ChatConfig {
            confidence_threshold: 0.0,
            seed: Some(9),
            ..ChatConfig::default()
        };

        let first: Vec<String> = {
            let engine = uncertain_engine(config.clone());
            (0..8)
                .map(|_| engine.respond(Some("hello")).unwrap())
                .collect()
        };
        let second: Vec<String> = {
            let engine = uncertain_engine(config);
            (0..8)
                .map(|_| engine.respond(Some("hello")).unwrap())
                .collect()
        };

        assert_eq!(first, second);
    }

    #[test]
    fn test_classify_reports_confidence() {
        let engine = uncertain_engine(ChatConfig::default());
        let prediction = engine.classify("hello").unwrap();

        assert!((prediction.confidence - 0.5).abs() < 1e-6);
        assert!(engine.tags().contains(&prediction.tag));
    }
}
