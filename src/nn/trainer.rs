//! Mini-batch gradient-descent training for the intent classifier.
//!
//! Training is a fixed-length supervised loop: examples are shuffled each
//! epoch, partitioned into batches, and the network weights are updated with
//! Adam against a softmax cross-entropy loss. There is no validation split,
//! no convergence check and no early stopping; the loop runs for exactly the
//! configured number of epochs.

use std::collections::HashMap;
use std::time::Instant;

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::analysis::TextPipeline;
use crate::dataset::IntentCatalog;
use crate::error::{ParleyError, Result};
use crate::features::BagOfWordsEncoder;
use crate::model::{ArtifactMetadata, ModelArtifact};
use crate::nn::network::{IntentNetwork, softmax};

/// Epochs between loss log lines and report checkpoints.
const LOG_INTERVAL: usize = 100;

/// Training hyperparameters.
///
/// The defaults are the tuned-by-convention values this classifier ships
/// with; tests may override them (notably `epochs` and `seed`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingConfig {
    /// Examples per gradient step; the last batch of an epoch may be shorter.
    pub batch_size: usize,
    /// Width of both hidden layers.
    pub hidden_size: usize,
    /// Adam learning rate.
    pub learning_rate: f32,
    /// Number of passes over the full training set.
    pub epochs: usize,
    /// Seed for weight initialization and epoch shuffling; `None` draws from
    /// the OS.
    pub seed: Option<u64>,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            batch_size: 8,
            hidden_size: 8,
            learning_rate: 0.001,
            epochs: 1000,
            seed: None,
        }
    }
}

/// Loss recorded at a logging checkpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LossCheckpoint {
    pub epoch: usize,
    pub loss: f32,
}

/// Summary of a completed training run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingReport {
    /// Number of (pattern, tag) training examples.
    pub examples: usize,
    /// Vocabulary size (input dimension).
    pub vocabulary_size: usize,
    /// Number of intent tags (output dimension).
    pub tag_count: usize,
    /// Epochs run.
    pub epochs: usize,
    /// Mean loss of the last batch of the last epoch.
    pub final_loss: f32,
    /// Losses at each logging checkpoint.
    pub checkpoints: Vec<LossCheckpoint>,
    /// Wall-clock training time.
    pub elapsed_ms: u64,
}

/// Fits classifier weights to a labeled intent catalog.
pub struct Trainer {
    config: TrainingConfig,
}

impl Trainer {
    /// Create a trainer with the given configuration.
    pub fn new(config: TrainingConfig) -> Self {
        Trainer { config }
    }

    /// The active configuration.
    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    /// Train a network on the catalog and bundle it into a model artifact.
    pub fn train(&self, catalog: &IntentCatalog) -> Result<(ModelArtifact, TrainingReport)> {
        if self.config.batch_size == 0 {
            return Err(ParleyError::training("batch size must be non-zero"));
        }
        if self.config.epochs == 0 {
            return Err(ParleyError::training("epoch count must be non-zero"));
        }

        let start = Instant::now();
        let pipeline = TextPipeline::new();
        let encoder = BagOfWordsEncoder::fit(catalog, &pipeline)?;
        let tags = catalog.tags();
        let label_of: HashMap<&str, usize> = tags
            .iter()
            .enumerate()
            .map(|(i, tag)| (tag.as_str(), i))
            .collect();

        // One training example per (pattern, tag) occurrence.
        let mut examples = Vec::new();
        for intent in catalog.intents() {
            let label = label_of[intent.tag.as_str()];
            for pattern in &intent.patterns {
                let stems = pipeline.stems(pattern)?;
                examples.push((encoder.encode(&stems), label));
            }
        }

        let mut rng = match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let mut network = IntentNetwork::new(
            encoder.len(),
            self.config.hidden_size,
            tags.len(),
            &mut rng,
        );
        let mut adam = Adam::new(self.config.learning_rate, &network);

        let mut order: Vec<usize> = (0..examples.len()).collect();
        let mut last_loss = 0.0_f32;
        let mut checkpoints = Vec::new();

        for epoch in 1..=self.config.epochs {
            order.shuffle(&mut rng);
            for batch in order.chunks(self.config.batch_size) {
                let (loss, grads) = batch_gradients(&network, &examples, batch);
                adam.apply(&mut network, &grads);
                last_loss = loss;
            }

            if epoch % LOG_INTERVAL == 0 {
                log::info!(
                    "epoch {epoch}/{}, loss {last_loss:.4}",
                    self.config.epochs
                );
                checkpoints.push(LossCheckpoint {
                    epoch,
                    loss: last_loss,
                });
            }
        }
        log::info!("training complete, final loss {last_loss:.4}");

        let metadata = ArtifactMetadata {
            trained_at: chrono::Utc::now(),
            training_examples: examples.len(),
            final_loss: last_loss,
        };
        let report = TrainingReport {
            examples: examples.len(),
            vocabulary_size: encoder.len(),
            tag_count: tags.len(),
            epochs: self.config.epochs,
            final_loss: last_loss,
            checkpoints,
            elapsed_ms: start.elapsed().as_millis() as u64,
        };
        let artifact =
            ModelArtifact::from_network(&network, encoder.words().to_vec(), tags, metadata);

        Ok((artifact, report))
    }
}

/// Per-tensor gradients mirroring the network's layer shapes.
struct Gradients {
    w: [Vec<f32>; 3],
    b: [Vec<f32>; 3],
}

impl Gradients {
    fn zeros(network: &IntentNetwork) -> Self {
        let [l1, l2, l3] = network.layers();
        Gradients {
            w: [
                vec![0.0; l1.in_features() * l1.out_features()],
                vec![0.0; l2.in_features() * l2.out_features()],
                vec![0.0; l3.in_features() * l3.out_features()],
            ],
            b: [
                vec![0.0; l1.out_features()],
                vec![0.0; l2.out_features()],
                vec![0.0; l3.out_features()],
            ],
        }
    }

    fn scale(&mut self, factor: f32) {
        for tensor in self.w.iter_mut().chain(self.b.iter_mut()) {
            for g in tensor {
                *g *= factor;
            }
        }
    }
}

/// Mean cross-entropy loss and gradients over one batch of examples.
fn batch_gradients(
    network: &IntentNetwork,
    examples: &[(Vec<f32>, usize)],
    batch: &[usize],
) -> (f32, Gradients) {
    let [_, l2, l3] = network.layers();
    let hidden = network.hidden_size();
    let mut grads = Gradients::zeros(network);
    let mut loss = 0.0_f32;

    for &idx in batch {
        let (features, label) = &examples[idx];
        let trace = network.trace(features);

        // Cross-entropy through log-softmax: -log p[label].
        let max = trace.logits.iter().copied().fold(f32::NEG_INFINITY, f32::max);
        let log_sum = trace
            .logits
            .iter()
            .map(|&v| (v - max).exp())
            .sum::<f32>()
            .ln()
            + max;
        loss += log_sum - trace.logits[*label];

        // Output delta: softmax minus one-hot target.
        let mut d3 = softmax(&trace.logits);
        d3[*label] -= 1.0;
        accumulate(&mut grads.w[2], &mut grads.b[2], &d3, &trace.a2);

        // Backpropagate through l3 and the second ReLU.
        let mut d2 = vec![0.0_f32; hidden];
        for (i, d) in d2.iter_mut().enumerate() {
            if trace.z2[i] > 0.0 {
                *d = d3
                    .iter()
                    .enumerate()
                    .map(|(j, &dj)| l3.row(j)[i] * dj)
                    .sum();
            }
        }
        accumulate(&mut grads.w[1], &mut grads.b[1], &d2, &trace.a1);

        // And through l2 and the first ReLU.
        let mut d1 = vec![0.0_f32; hidden];
        for (i, d) in d1.iter_mut().enumerate() {
            if trace.z1[i] > 0.0 {
                *d = d2
                    .iter()
                    .enumerate()
                    .map(|(j, &dj)| l2.row(j)[i] * dj)
                    .sum();
            }
        }
        accumulate(&mut grads.w[0], &mut grads.b[0], &d1, features);
    }

    let scale = 1.0 / batch.len() as f32;
    grads.scale(scale);
    (loss * scale, grads)
}

/// Accumulate one layer's gradient contribution:
/// `dW[j][i] += delta[j] * input[i]`, `db[j] += delta[j]`.
fn accumulate(grad_w: &mut [f32], grad_b: &mut [f32], delta: &[f32], input: &[f32]) {
    let n = input.len();
    for (j, &dj) in delta.iter().enumerate() {
        grad_b[j] += dj;
        for (g, &x) in grad_w[j * n..(j + 1) * n].iter_mut().zip(input) {
            *g += dj * x;
        }
    }
}

/// Adam optimizer with bias-corrected moment estimates.
struct Adam {
    learning_rate: f32,
    beta1: f32,
    beta2: f32,
    epsilon: f32,
    step: i32,
    /// First/second moments per tensor: w1, b1, w2, b2, w3, b3.
    moments: Vec<Moments>,
}

struct Moments {
    m: Vec<f32>,
    v: Vec<f32>,
}

impl Moments {
    fn zeros(len: usize) -> Self {
        Moments {
            m: vec![0.0; len],
            v: vec![0.0; len],
        }
    }
}

impl Adam {
    fn new(learning_rate: f32, network: &IntentNetwork) -> Self {
        let moments = network
            .layers()
            .iter()
            .flat_map(|layer| {
                [
                    Moments::zeros(layer.in_features() * layer.out_features()),
                    Moments::zeros(layer.out_features()),
                ]
            })
            .collect();

        Adam {
            learning_rate,
            beta1: 0.9,
            beta2: 0.999,
            epsilon: 1e-8,
            step: 0,
            moments,
        }
    }

    fn apply(&mut self, network: &mut IntentNetwork, grads: &Gradients) {
        self.step += 1;
        let correction1 = 1.0 - self.beta1.powi(self.step);
        let correction2 = 1.0 - self.beta2.powi(self.step);

        let grad_pairs = [
            (&grads.w[0], &grads.b[0]),
            (&grads.w[1], &grads.b[1]),
            (&grads.w[2], &grads.b[2]),
        ];
        for (slot, (layer, (gw, gb))) in network
            .layers_mut()
            .into_iter()
            .zip(grad_pairs)
            .enumerate()
        {
            self.update(2 * slot, layer.weights_mut(), gw, correction1, correction2);
            self.update(2 * slot + 1, layer.bias_mut(), gb, correction1, correction2);
        }
    }

    fn update(
        &mut self,
        slot: usize,
        params: &mut [f32],
        grads: &[f32],
        correction1: f32,
        correction2: f32,
    ) {
        let Moments { m, v } = &mut self.moments[slot];
        for i in 0..params.len() {
            let g = grads[i];
            m[i] = self.beta1 * m[i] + (1.0 - self.beta1) * g;
            v[i] = self.beta2 * v[i] + (1.0 - self.beta2) * g * g;
            let m_hat = m[i] / correction1;
            let v_hat = v[i] / correction2;
            params[i] -= self.learning_rate * m_hat / (v_hat.sqrt() + self.epsilon);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Intent;

    fn toy_catalog() -> IntentCatalog {
        IntentCatalog::from_intents(vec![
            Intent {
                tag: "greeting".to_string(),
                patterns: vec![
                    "Hi".to_string(),
                    "Hello there".to_string(),
                    "Is anyone there?".to_string(),
                ],
                responses: vec!["Hello!".to_string()],
            },
            Intent {
                tag: "goodbye".to_string(),
                patterns: vec![
                    "Bye".to_string(),
                    "See you later".to_string(),
                    "Goodbye".to_string(),
                ],
                responses: vec!["See you!".to_string()],
            },
            Intent {
                tag: "thanks".to_string(),
                patterns: vec![
                    "Thanks".to_string(),
                    "Thank you so much".to_string(),
                    "That was helpful".to_string(),
                ],
                responses: vec!["Happy to help!".to_string()],
            },
        ])
        .unwrap()
    }

    #[test]
    fn test_training_reduces_loss() {
        let trainer = Trainer::new(TrainingConfig {
            epochs: 500,
            seed: Some(3),
            ..TrainingConfig::default()
        });
        let (artifact, report) = trainer.train(&toy_catalog()).unwrap();

        // An untrained 3-class softmax sits near ln(3) ~ 1.10.
        assert!(report.final_loss < 1.0, "loss {}", report.final_loss);
        assert_eq!(report.examples, 9);
        assert_eq!(report.tag_count, 3);
        assert_eq!(report.checkpoints.len(), 5);
        assert_eq!(artifact.tags, vec!["goodbye", "greeting", "thanks"]);
        assert_eq!(artifact.input_size, report.vocabulary_size);
    }

    #[test]
    fn test_training_deterministic_with_seed() {
        let config = TrainingConfig {
            epochs: 100,
            seed: Some(7),
            ..TrainingConfig::default()
        };

        let (_, first) = Trainer::new(config.clone()).train(&toy_catalog()).unwrap();
        let (_, second) = Trainer::new(config).train(&toy_catalog()).unwrap();

        assert!((first.final_loss - second.final_loss).abs() < 1e-6);
    }

    #[test]
    fn test_zero_batch_size_rejected() {
        let trainer = Trainer::new(TrainingConfig {
            batch_size: 0,
            ..TrainingConfig::default()
        });

        assert!(matches!(
            trainer.train(&toy_catalog()),
            Err(ParleyError::Training(_))
        ));
    }

    #[test]
    fn test_zero_epochs_rejected() {
        let trainer = Trainer::new(TrainingConfig {
            epochs: 0,
            ..TrainingConfig::default()
        });

        assert!(matches!(
            trainer.train(&toy_catalog()),
            Err(ParleyError::Training(_))
        ));
    }

    #[test]
    fn test_default_config_matches_shipped_hyperparameters() {
        let config = TrainingConfig::default();

        assert_eq!(config.batch_size, 8);
        assert_eq!(config.hidden_size, 8);
        assert_eq!(config.epochs, 1000);
        assert!((config.learning_rate - 0.001).abs() < f32::EPSILON);
        assert!(config.seed.is_none());
    }
}
