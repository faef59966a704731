//! Error types for the orchestration layer.
//!
//! Every variant here is a validation failure: it is reported
//! synchronously and no ledger state has changed when it is returned.
//! Failures that occur *after* a state change (a deducted card, a session
//! marked settling) never surface as `OpsError`; they travel inside the
//! operation's structured result so the caller always learns where the
//! money is.

use coinslot_store::StoreError;
use thiserror::Error;

/// Result type for kiosk operations.
pub type OpsResult<T> = std::result::Result<T, OpsError>;

/// Errors that can occur during kiosk operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum OpsError {
    // =========================================================================
    // Session Errors
    // =========================================================================
    /// No session with this id.
    #[error("session not found: {0}")]
    SessionNotFound(String),

    /// The session exists but is no longer ACTIVE.
    #[error("session {0} is not active")]
    SessionNotActive(String),

    /// The session has nothing to settle or convert.
    #[error("session {0} has no balance")]
    NoBalance(String),

    // =========================================================================
    // Card Errors
    // =========================================================================
    /// No card with this wallet id.
    #[error("card not found: {0}")]
    CardNotFound(String),

    /// The card is frozen and rejects mutations.
    #[error("card {0} is frozen")]
    CardFrozen(String),

    /// Deduction would overdraw the card.
    #[error("insufficient balance: have {have}, need {need}")]
    InsufficientBalance {
        /// Available balance
        have: coinslot_types::Amount,
        /// Requested amount
        need: coinslot_types::Amount,
    },

    /// The card has no PIN yet; spending requires one.
    #[error("card {0} has no PIN set")]
    PinNotSet(String),

    // =========================================================================
    // Wallet / Shared Errors
    // =========================================================================
    /// Wrong PIN for a card or PIN wallet.
    #[error("invalid PIN")]
    InvalidPin,

    /// No claimable wallet with this id. A settled wallet is
    /// indistinguishable from an absent one.
    #[error("wallet not found or already claimed: {0}")]
    WalletNotFound(String),

    /// Zero or malformed amount.
    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    /// Adding this amount would overflow the ledger precision.
    #[error("amount overflow")]
    Overflow,

    /// The destination chain is not in the supported registry.
    #[error("unsupported chain: {0}")]
    UnsupportedChain(String),

    /// No merchant with this id.
    #[error("merchant not found: {0}")]
    MerchantNotFound(String),

    // =========================================================================
    // Infrastructure
    // =========================================================================
    /// Ledger persistence failed; no partial state was committed.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl OpsError {
    /// Create a SessionNotFound error.
    pub fn session_not_found(id: impl Into<String>) -> Self {
        Self::SessionNotFound(id.into())
    }

    /// Create a CardNotFound error.
    pub fn card_not_found(id: impl Into<String>) -> Self {
        Self::CardNotFound(id.into())
    }

    /// Create a WalletNotFound error.
    pub fn wallet_not_found(id: impl Into<String>) -> Self {
        Self::WalletNotFound(id.into())
    }

    /// Create an InvalidAmount error.
    pub fn invalid_amount(msg: impl Into<String>) -> Self {
        Self::InvalidAmount(msg.into())
    }

    /// Create an UnsupportedChain error.
    pub fn unsupported_chain(key: impl Into<String>) -> Self {
        Self::UnsupportedChain(key.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coinslot_types::Amount;

    #[test]
    fn test_error_display() {
        let err = OpsError::InsufficientBalance {
            have: Amount::parse("5.00").unwrap(),
            need: Amount::parse("7.00").unwrap(),
        };
        assert!(err.to_string().contains("5.000000"));
        assert!(err.to_string().contains("7.000000"));

        assert_eq!(OpsError::InvalidPin.to_string(), "invalid PIN");
    }

    #[test]
    fn test_store_error_converts() {
        let err: OpsError = StoreError::not_found("A1B2C3").into();
        assert!(matches!(err, OpsError::Store(_)));
    }
}
