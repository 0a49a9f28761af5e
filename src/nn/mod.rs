//! Classifier network and training loop.

pub mod network;
pub mod trainer;

pub use network::{IntentNetwork, Linear, softmax};
pub use trainer::{LossCheckpoint, Trainer, TrainingConfig, TrainingReport};
