//! PIN wallet records.

use serde::{Deserialize, Serialize};

use crate::{Amount, Timestamp};

/// Claim state of a PIN wallet.
///
/// `Pending -> {Settled | PendingBridge}`; `PendingBridge` stays claimable
/// for retries, `Settled` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WalletStatus {
    Pending,
    PendingBridge,
    Settled,
}

/// An anonymous, single-claim value holder, created when a session ends
/// without an on-chain destination.
///
/// `amount` is fixed at creation; the value is released at most once, by a
/// successful bridge during claim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PinWallet {
    pub id: String,
    pub pin_hash: String,
    pub amount: Amount,
    pub created_at: Timestamp,
    /// Destination recorded on the first claim attempt, reused by retries.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_chain: Option<String>,
    pub status: WalletStatus,
    pub bridge_attempts: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_bridge_error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_bridge_attempt: Option<Timestamp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bridge_tx_hash: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settled_at: Option<Timestamp>,
}

impl PinWallet {
    /// Create a `PENDING` wallet holding `amount`.
    pub fn new(
        id: impl Into<String>,
        pin_hash: impl Into<String>,
        amount: Amount,
        now: Timestamp,
    ) -> Self {
        Self {
            id: id.into(),
            pin_hash: pin_hash.into(),
            amount,
            created_at: now,
            destination: None,
            target_chain: None,
            status: WalletStatus::Pending,
            bridge_attempts: 0,
            last_bridge_error: None,
            last_bridge_attempt: None,
            bridge_tx_hash: None,
            settled_at: None,
        }
    }

    /// True while the wallet's value can still be claimed.
    pub fn is_claimable(&self) -> bool {
        matches!(self.status, WalletStatus::Pending | WalletStatus::PendingBridge)
    }
}
