//! Error types for the Parley library.
//!
//! All fallible operations in Parley return [`Result`], whose error type is
//! the [`ParleyError`] enum. Startup-time failures (a malformed dataset, a
//! missing or inconsistent model artifact) are fatal; there are no
//! recoverable mid-request errors.
//!
//! # Examples
//!
//! ```
//! use parley::error::{ParleyError, Result};
//!
//! fn example_operation() -> Result<()> {
//!     Err(ParleyError::dataset("intent has no patterns"))
//! }
//!
//! match example_operation() {
//!     Ok(_) => println!("Success"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::io;

use anyhow;
use thiserror::Error;

/// The main error type for Parley operations.
#[derive(Error, Debug)]
pub enum ParleyError {
    /// I/O errors (reading datasets, writing model artifacts, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Dataset-related errors (missing fields, empty intents, duplicate tags)
    #[error("Dataset error: {0}")]
    Dataset(String),

    /// Analysis-related errors (tokenization, stemming)
    #[error("Analysis error: {0}")]
    Analysis(String),

    /// Model artifact errors (missing file, shape/dimension mismatch)
    #[error("Model error: {0}")]
    Model(String),

    /// Training-related errors
    #[error("Training error: {0}")]
    Training(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error for other cases
    #[error("Error: {0}")]
    Other(String),

    /// Generic anyhow error
    #[error("Anyhow error: {0}")]
    Anyhow(#[from] anyhow::Error),
}

/// Result type alias for operations that may fail with ParleyError.
pub type Result<T> = std::result::Result<T, ParleyError>;

impl ParleyError {
    /// Create a new dataset error.
    pub fn dataset<S: Into<String>>(msg: S) -> Self {
        ParleyError::Dataset(msg.into())
    }

    /// Create a new analysis error.
    pub fn analysis<S: Into<String>>(msg: S) -> Self {
        ParleyError::Analysis(msg.into())
    }

    /// Create a new model error.
    pub fn model<S: Into<String>>(msg: S) -> Self {
        ParleyError::Model(msg.into())
    }

    /// Create a new training error.
    pub fn training<S: Into<String>>(msg: S) -> Self {
        ParleyError::Training(msg.into())
    }

    /// Create a new generic error.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        ParleyError::Other(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_construction() {
        let error = ParleyError::dataset("missing responses");
        assert_eq!(error.to_string(), "Dataset error: missing responses");

        let error = ParleyError::model("dimension mismatch");
        assert_eq!(error.to_string(), "Model error: dimension mismatch");

        let error = ParleyError::analysis("bad token stream");
        assert_eq!(error.to_string(), "Analysis error: bad token stream");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let parley_error = ParleyError::from(io_error);

        match parley_error {
            ParleyError::Io(_) => {}
            _ => panic!("Expected IO error variant"),
        }
    }
}
