//! Error types for vectorgate

use thiserror::Error;

#[derive(Debug, Error)]
pub enum VectorgateError {
    // Document errors
    #[error("Document not found: {id}")]
    DocumentNotFound { id: String },

    #[error("Document {id} has no embedding")]
    MissingEmbedding { id: String },

    #[error("Embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    // Configuration errors
    #[error("Missing required configuration: {key}")]
    ConfigMissing { key: String },

    #[error("Invalid configuration value for {key}: {reason}")]
    ConfigInvalid { key: String, reason: String },

    // Storage backend errors, surfaced unmodified
    #[error("Storage backend error: {message}")]
    Backend { message: String },

    // Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl VectorgateError {
    /// Wrap a storage client failure without reinterpreting it.
    pub fn backend(err: impl std::fmt::Display) -> Self {
        VectorgateError::Backend { message: err.to_string() }
    }
}

pub type Result<T> = std::result::Result<T, VectorgateError>;
