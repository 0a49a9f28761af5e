//! Command line argument parsing for the Parley CLI using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Parley - a small intent-classification chatbot
#[derive(Parser, Debug, Clone)]
#[command(name = "parley")]
#[command(about = "A small intent-classification chatbot")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct ParleyArgs {
    /// Verbosity level (0=quiet, 1=normal, 2=verbose, 3=debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long)]
    pub quiet: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl ParleyArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1, // Default to normal
                n => n,
            }
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Train a model from an intents dataset
    Train(TrainArgs),

    /// Answer a single message
    Ask(AskArgs),

    /// Interactive chat session
    Chat(ChatArgs),
}

/// Arguments for training
#[derive(Parser, Debug, Clone)]
pub struct TrainArgs {
    /// Path to the intents dataset (JSON)
    #[arg(value_name = "DATASET_FILE")]
    pub dataset: PathBuf,

    /// Where to write the model artifact
    #[arg(short, long, value_name = "MODEL_FILE", default_value = "model.bin")]
    pub model: PathBuf,

    /// Number of training epochs
    #[arg(long, default_value = "1000")]
    pub epochs: usize,

    /// Seed for weight initialization and shuffling
    #[arg(long)]
    pub seed: Option<u64>,
}

/// Arguments for answering a single message
#[derive(Parser, Debug, Clone)]
pub struct AskArgs {
    /// Path to the model artifact
    #[arg(short, long, value_name = "MODEL_FILE", default_value = "model.bin")]
    pub model: PathBuf,

    /// Path to the intents dataset (JSON)
    #[arg(short, long, value_name = "DATASET_FILE")]
    pub dataset: PathBuf,

    /// The message to answer
    #[arg(value_name = "MESSAGE")]
    pub message: String,
}

/// Arguments for an interactive session
#[derive(Parser, Debug, Clone)]
pub struct ChatArgs {
    /// Path to the model artifact
    #[arg(short, long, value_name = "MODEL_FILE", default_value = "model.bin")]
    pub model: PathBuf,

    /// Path to the intents dataset (JSON)
    #[arg(short, long, value_name = "DATASET_FILE")]
    pub dataset: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_levels() {
        let args = ParleyArgs::parse_from(["parley", "ask", "-d", "intents.json", "hi"]);
        assert_eq!(args.verbosity(), 1);

        let args = ParleyArgs::parse_from(["parley", "-vv", "ask", "-d", "intents.json", "hi"]);
        assert_eq!(args.verbosity(), 2);

        let args = ParleyArgs::parse_from(["parley", "-q", "ask", "-d", "intents.json", "hi"]);
        assert_eq!(args.verbosity(), 0);
    }

    #[test]
    fn test_train_defaults() {
        let args = ParleyArgs::parse_from(["parley", "train", "intents.json"]);
        match args.command {
            Command::Train(train) => {
                assert_eq!(train.model, PathBuf::from("model.bin"));
                assert_eq!(train.epochs, 1000);
                assert!(train.seed.is_none());
            }
            _ => panic!("expected train command"),
        }
    }
}
