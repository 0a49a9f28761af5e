//! Model artifact persistence.
//!
//! A trained classifier is persisted as a single binary file bundling the
//! three layers' weights, the declared dimensions, the vocabulary, and the
//! tag list. The vocabulary and tag list fix the meaning of the weight
//! matrices (feature indices and class labels), so the bundle always travels
//! as one unit; loading validates that the declared dimensions agree with the
//! persisted shapes and rejects the artifact otherwise.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{ParleyError, Result};
use crate::nn::network::{IntentNetwork, Linear};

/// Bookkeeping recorded alongside the weights.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactMetadata {
    /// When training finished.
    pub trained_at: DateTime<Utc>,
    /// Number of training examples used.
    pub training_examples: usize,
    /// Loss of the last training batch.
    pub final_loss: f32,
}

/// A trained model bundle: weights, dimensions, vocabulary and tags.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifact {
    /// Input dimension; must equal the vocabulary length.
    pub input_size: usize,
    /// Hidden layer width.
    pub hidden_size: usize,
    /// Output dimension; must equal the tag list length.
    pub output_size: usize,
    /// Vocabulary in feature-index order.
    pub vocabulary: Vec<String>,
    /// Tags in class-label order.
    pub tags: Vec<String>,
    /// The three linear layers, input-first.
    layers: Vec<Linear>,
    /// Training bookkeeping.
    pub metadata: ArtifactMetadata,
}

impl ModelArtifact {
    /// Bundle a trained network with the vocabulary and tags it was fit on.
    pub fn from_network(
        network: &IntentNetwork,
        vocabulary: Vec<String>,
        tags: Vec<String>,
        metadata: ArtifactMetadata,
    ) -> Self {
        ModelArtifact {
            input_size: network.input_size(),
            hidden_size: network.hidden_size(),
            output_size: network.output_size(),
            vocabulary,
            tags,
            layers: network.layers().into_iter().cloned().collect(),
            metadata,
        }
    }

    /// Write the artifact to a file, overwriting any existing one.
    pub fn save(&self, path: &Path) -> Result<()> {
        let file = File::create(path)?;
        let writer = BufWriter::new(file);
        bincode::serialize_into(writer, self).map_err(|e| {
            ParleyError::model(format!("cannot write artifact {}: {e}", path.display()))
        })?;
        Ok(())
    }

    /// Read and validate an artifact from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| {
            ParleyError::model(format!("cannot open artifact {}: {e}", path.display()))
        })?;
        let reader = BufReader::new(file);
        let artifact: ModelArtifact = bincode::deserialize_from(reader).map_err(|e| {
            ParleyError::model(format!("cannot decode artifact {}: {e}", path.display()))
        })?;
        artifact.validate()?;
        Ok(artifact)
    }

    /// Check the declared dimensions against the persisted shapes.
    pub fn validate(&self) -> Result<()> {
        if self.layers.len() != 3 {
            return Err(ParleyError::model(format!(
                "expected 3 layers, found {}",
                self.layers.len()
            )));
        }

        let expected = [
            (self.input_size, self.hidden_size),
            (self.hidden_size, self.hidden_size),
            (self.hidden_size, self.output_size),
        ];
        for (i, (layer, (in_features, out_features))) in
            self.layers.iter().zip(expected).enumerate()
        {
            if !layer.is_consistent()
                || layer.in_features() != in_features
                || layer.out_features() != out_features
            {
                return Err(ParleyError::model(format!(
                    "layer {} shape {}x{} disagrees with declared dimensions {}x{}",
                    i + 1,
                    layer.out_features(),
                    layer.in_features(),
                    out_features,
                    in_features,
                )));
            }
        }

        if self.vocabulary.len() != self.input_size {
            return Err(ParleyError::model(format!(
                "vocabulary length {} disagrees with input size {}",
                self.vocabulary.len(),
                self.input_size
            )));
        }
        if self.tags.len() != self.output_size {
            return Err(ParleyError::model(format!(
                "tag list length {} disagrees with output size {}",
                self.tags.len(),
                self.output_size
            )));
        }

        Ok(())
    }

    /// Validate, then rebuild the network and hand back the vocabulary and
    /// tag list it belongs to.
    pub fn into_network(self) -> Result<(IntentNetwork, Vec<String>, Vec<String>)> {
        self.validate()?;

        let mut layers = self.layers.into_iter();
        // validate() guarantees exactly three layers
        let (Some(l1), Some(l2), Some(l3)) = (layers.next(), layers.next(), layers.next()) else {
            return Err(ParleyError::model("artifact is missing layers"));
        };
        let network = IntentNetwork::from_layers(l1, l2, l3)?;

        Ok((network, self.vocabulary, self.tags))
    }
}
