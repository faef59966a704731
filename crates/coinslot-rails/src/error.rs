//! Error types for the settlement rails.

use thiserror::Error;

/// Result type alias for rail operations.
pub type RailResult<T> = std::result::Result<T, RailError>;

/// Errors surfaced by the channel, bridge, and gateway clients.
///
/// These represent transport-level or unexpected failures ("thrown"
/// errors); protocol-level failures travel inside the result types with
/// `success == false`. Orchestrators treat both the same where the flow
/// demands it.
#[derive(Debug, Error)]
pub enum RailError {
    /// Network error (retryable).
    #[error("network error: {0}")]
    Network(String),

    /// Operation timed out (retryable).
    #[error("operation timed out: {0}")]
    Timeout(String),

    /// The remote endpoint rejected or failed the call.
    #[error("rpc error: {0}")]
    Rpc(String),

    /// The chain key is not in the supported registry.
    #[error("unsupported chain: {0}")]
    UnsupportedChain(String),

    /// The remote response could not be adapted into the expected shape.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl RailError {
    /// Create a Network error.
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    /// Create a Timeout error.
    pub fn timeout(msg: impl Into<String>) -> Self {
        Self::Timeout(msg.into())
    }

    /// Create an Rpc error.
    pub fn rpc(msg: impl Into<String>) -> Self {
        Self::Rpc(msg.into())
    }

    /// Create an UnsupportedChain error.
    pub fn unsupported_chain(key: impl Into<String>) -> Self {
        Self::UnsupportedChain(key.into())
    }

    /// Create an InvalidResponse error.
    pub fn invalid_response(msg: impl Into<String>) -> Self {
        Self::InvalidResponse(msg.into())
    }

    /// Check if this error is retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Timeout(_))
    }
}
