//! # Parley
//!
//! A small intent-classification chatbot engine.
//!
//! ## Features
//!
//! - Pure Rust implementation
//! - Porter-stemmed bag-of-words features
//! - Three-layer dense classifier trained with Adam
//! - Single-file model artifacts
//! - Confidence-thresholded responses with a fixed fallback

pub mod analysis;
pub mod chat;
pub mod cli;
pub mod dataset;
pub mod error;
pub mod features;
pub mod model;
pub mod nn;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
