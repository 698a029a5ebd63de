//! Epoch runner error types

use thiserror::Error;

/// Errors surfaced while running an epoch
#[derive(Debug, Error)]
pub enum EpochError {
    #[error("Missing key in {context}: {key}")]
    MissingKey { context: &'static str, key: String },

    #[error("Shape mismatch for {key}: expected {expected}, got {actual}")]
    ShapeMismatch {
        key: String,
        expected: String,
        actual: String,
    },

    #[error("Forward pass failed: {0}")]
    Forward(String),

    #[error("Criterion failed: {0}")]
    Criterion(String),

    #[error("Backward pass failed on batch {batch}: {source}")]
    Backward {
        batch: usize,
        #[source]
        source: Box<EpochError>,
    },

    #[error("Cannot concatenate an empty list of tensors")]
    EmptyConcat,
}

/// Result type for epoch operations
pub type Result<T> = std::result::Result<T, EpochError>;
