//! Error types for the `rag-store` crate.

use thiserror::Error;

/// Errors that can occur in knowledge store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Caller-supplied input is unusable (empty text, zero-chunk result).
    ///
    /// Recoverable by correcting the input; never retried internally.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The embedding provider was unreachable, returned a non-success
    /// status, or returned a response without an embedding.
    #[error("Embedding provider error: {message}")]
    Provider {
        /// Upstream HTTP status, when one was received.
        status: Option<u16>,
        /// A description of the failure.
        message: String,
    },

    /// A failure while persisting the document collection.
    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),

    /// A configuration validation error.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// A convenience result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
