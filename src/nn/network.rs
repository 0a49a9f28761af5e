//! Feed-forward classifier network.
//!
//! The classifier is a three-layer dense network with ReLU activations
//! between layers and raw logits on the output:
//!
//! ```text
//! input → Linear → ReLU → Linear → ReLU → Linear → logits
//! ```
//!
//! Softmax and argmax are the caller's responsibility. Weights are mutated
//! only by the trainer; after that the network is read-only and a forward
//! pass is a pure function of its input.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{ParleyError, Result};

/// A dense layer computing `weights · input + bias`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Linear {
    /// Row-major weight matrix, one row per output neuron.
    weights: Vec<f32>,
    bias: Vec<f32>,
    in_features: usize,
    out_features: usize,
}

impl Linear {
    /// Create a layer with weights and biases drawn uniformly from
    /// `±1/sqrt(in_features)`.
    pub fn new(in_features: usize, out_features: usize, rng: &mut impl Rng) -> Self {
        let bound = 1.0 / (in_features as f32).sqrt();
        let weights = (0..in_features * out_features)
            .map(|_| rng.random_range(-bound..bound))
            .collect();
        let bias = (0..out_features)
            .map(|_| rng.random_range(-bound..bound))
            .collect();

        Linear {
            weights,
            bias,
            in_features,
            out_features,
        }
    }

    /// Reconstruct a layer from persisted parts, checking shape consistency.
    pub fn from_parts(
        weights: Vec<f32>,
        bias: Vec<f32>,
        in_features: usize,
        out_features: usize,
    ) -> Result<Self> {
        let layer = Linear {
            weights,
            bias,
            in_features,
            out_features,
        };
        if !layer.is_consistent() {
            return Err(ParleyError::model(format!(
                "layer parameters do not match declared shape {}x{}",
                layer.out_features, layer.in_features
            )));
        }
        Ok(layer)
    }

    /// Matrix-vector product plus bias.
    pub fn forward(&self, input: &[f32]) -> Vec<f32> {
        debug_assert_eq!(input.len(), self.in_features);

        let mut output = Vec::with_capacity(self.out_features);
        for j in 0..self.out_features {
            let mut sum = self.bias[j];
            for (w, x) in self.row(j).iter().zip(input) {
                sum += w * x;
            }
            output.push(sum);
        }
        output
    }

    /// Input dimension.
    pub fn in_features(&self) -> usize {
        self.in_features
    }

    /// Output dimension.
    pub fn out_features(&self) -> usize {
        self.out_features
    }

    /// Whether the parameter vectors agree with the declared dimensions.
    pub fn is_consistent(&self) -> bool {
        self.weights.len() == self.in_features * self.out_features
            && self.bias.len() == self.out_features
    }

    /// The weight row feeding output neuron `j`.
    pub(crate) fn row(&self, j: usize) -> &[f32] {
        &self.weights[j * self.in_features..(j + 1) * self.in_features]
    }

    pub(crate) fn weights_mut(&mut self) -> &mut [f32] {
        &mut self.weights
    }

    pub(crate) fn bias_mut(&mut self) -> &mut [f32] {
        &mut self.bias
    }
}

/// Three-layer intent classifier producing raw logits over the tag list.
#[derive(Debug, Clone)]
pub struct IntentNetwork {
    l1: Linear,
    l2: Linear,
    l3: Linear,
}

/// Intermediate values of a forward pass, kept for backpropagation.
#[derive(Debug)]
pub(crate) struct ForwardTrace {
    pub z1: Vec<f32>,
    pub a1: Vec<f32>,
    pub z2: Vec<f32>,
    pub a2: Vec<f32>,
    pub logits: Vec<f32>,
}

impl IntentNetwork {
    /// Create a network with randomly initialized weights.
    pub fn new(
        input_size: usize,
        hidden_size: usize,
        output_size: usize,
        rng: &mut impl Rng,
    ) -> Self {
        IntentNetwork {
            l1: Linear::new(input_size, hidden_size, rng),
            l2: Linear::new(hidden_size, hidden_size, rng),
            l3: Linear::new(hidden_size, output_size, rng),
        }
    }

    /// Assemble a network from persisted layers, checking that the layers
    /// chain together.
    pub fn from_layers(l1: Linear, l2: Linear, l3: Linear) -> Result<Self> {
        if l1.out_features() != l2.in_features() || l2.out_features() != l3.in_features() {
            return Err(ParleyError::model(format!(
                "layer dimensions do not chain: {}x{} -> {}x{} -> {}x{}",
                l1.out_features(),
                l1.in_features(),
                l2.out_features(),
                l2.in_features(),
                l3.out_features(),
                l3.in_features(),
            )));
        }
        Ok(IntentNetwork { l1, l2, l3 })
    }

    /// Forward pass: returns raw logits, one per tag.
    pub fn forward(&self, input: &[f32]) -> Vec<f32> {
        let mut h = self.l1.forward(input);
        relu(&mut h);
        let mut h = self.l2.forward(&h);
        relu(&mut h);
        self.l3.forward(&h)
    }

    /// Forward pass keeping pre-activations for backpropagation.
    pub(crate) fn trace(&self, input: &[f32]) -> ForwardTrace {
        let z1 = self.l1.forward(input);
        let mut a1 = z1.clone();
        relu(&mut a1);
        let z2 = self.l2.forward(&a1);
        let mut a2 = z2.clone();
        relu(&mut a2);
        let logits = self.l3.forward(&a2);

        ForwardTrace {
            z1,
            a1,
            z2,
            a2,
            logits,
        }
    }

    /// Input dimension (vocabulary size).
    pub fn input_size(&self) -> usize {
        self.l1.in_features()
    }

    /// Hidden layer width.
    pub fn hidden_size(&self) -> usize {
        self.l1.out_features()
    }

    /// Output dimension (number of tags).
    pub fn output_size(&self) -> usize {
        self.l3.out_features()
    }

    /// The three layers, input-first.
    pub fn layers(&self) -> [&Linear; 3] {
        [&self.l1, &self.l2, &self.l3]
    }

    pub(crate) fn layers_mut(&mut self) -> [&mut Linear; 3] {
        [&mut self.l1, &mut self.l2, &mut self.l3]
    }
}

/// Elementwise `max(0, x)`.
pub(crate) fn relu(values: &mut [f32]) {
    for v in values {
        *v = v.max(0.0);
    }
}

/// Numerically stable softmax over raw logits.
pub fn softmax(logits: &[f32]) -> Vec<f32> {
    let max = logits.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = logits.iter().map(|&v| (v - max).exp()).collect();
    let sum: f32 = exps.iter().sum();
    exps.into_iter().map(|v| v / sum).collect()
}
