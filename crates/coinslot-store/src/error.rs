//! Error types for the ledger store.

use thiserror::Error;

/// Result type alias for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors that can occur during ledger persistence.
#[derive(Debug, Error)]
pub enum StoreError {
    /// I/O error while reading or writing a snapshot file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// No record with the given key.
    #[error("record not found: {0}")]
    NotFound(String),

    /// A record with the given key already exists.
    #[error("duplicate record: {0}")]
    Duplicate(String),

    /// A collection mutex was poisoned by a panicking thread.
    #[error("lock poisoned: {0}")]
    LockPoisoned(String),
}

impl StoreError {
    /// Create a NotFound error.
    pub fn not_found(key: impl Into<String>) -> Self {
        StoreError::NotFound(key.into())
    }

    /// Create a Duplicate error.
    pub fn duplicate(key: impl Into<String>) -> Self {
        StoreError::Duplicate(key.into())
    }

    /// Create a LockPoisoned error.
    pub fn lock_poisoned(msg: impl Into<String>) -> Self {
        StoreError::LockPoisoned(msg.into())
    }
}
