//! Concrete result types for the rail clients.
//!
//! Real SDK responses are loosely typed; adapters narrow them into these
//! shapes at the boundary so the core never sees upstream schema drift.
//! Protocol-level failures are carried as `success == false` with an
//! `error` string; see `RailError` for transport-level failures.

use serde::{Deserialize, Serialize};

use coinslot_types::Amount;

/// Identifier of an off-chain payment channel.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChannelId(String);

impl ChannelId {
    /// Wrap a raw channel identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The raw identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ChannelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ChannelId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// On-chain status of a submitted bridge transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxStatus {
    Success,
    Pending,
    Reverted,
}

/// Outcome of a bridge transfer.
///
/// `success` is true for confirmed and still-pending transfers alike: once
/// the burn is accepted the value is in flight, and a pending mint
/// completes without further action from the kiosk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BridgeOutcome {
    pub success: bool,
    pub tx_status: TxStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tx_hash: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explorer_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl BridgeOutcome {
    /// A confirmed transfer.
    pub fn confirmed(tx_hash: impl Into<String>, explorer_url: Option<String>) -> Self {
        Self {
            success: true,
            tx_status: TxStatus::Success,
            tx_hash: Some(tx_hash.into()),
            explorer_url,
            error: None,
        }
    }

    /// A transfer accepted but not yet confirmed on the destination.
    pub fn pending(tx_hash: Option<String>) -> Self {
        Self {
            success: true,
            tx_status: TxStatus::Pending,
            tx_hash,
            explorer_url: None,
            error: None,
        }
    }

    /// An explicitly failed transfer.
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            tx_status: TxStatus::Reverted,
            tx_hash: None,
            explorer_url: None,
            error: Some(error.into()),
        }
    }
}

/// Outcome of a gateway balance-reservation (deposit) step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayFunding {
    pub success: bool,
    /// True when a top-up deposit was actually submitted.
    pub deposited: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deposit_tx_hash: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl GatewayFunding {
    /// Balance was already sufficient.
    pub fn sufficient() -> Self {
        Self {
            success: true,
            deposited: false,
            deposit_tx_hash: None,
            error: None,
        }
    }

    /// A deposit was made to cover the shortfall.
    pub fn deposited(tx_hash: impl Into<String>) -> Self {
        Self {
            success: true,
            deposited: true,
            deposit_tx_hash: Some(tx_hash.into()),
            error: None,
        }
    }

    /// Funding failed; the rail balance is unchanged.
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            deposited: false,
            deposit_tx_hash: None,
            error: Some(error.into()),
        }
    }
}

/// Outcome of a gateway burn: the attestation needed for the mint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayTransfer {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attestation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl GatewayTransfer {
    /// A burn accepted by the gateway.
    pub fn accepted(attestation: impl Into<String>, signature: impl Into<String>) -> Self {
        Self {
            success: true,
            attestation: Some(attestation.into()),
            signature: Some(signature.into()),
            error: None,
        }
    }

    /// A rejected burn; nothing was moved.
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            attestation: None,
            signature: None,
            error: Some(error.into()),
        }
    }
}

/// Outcome of a gateway mint on the destination chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayMint {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tx_hash: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explorer_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl GatewayMint {
    /// A completed mint.
    pub fn minted(tx_hash: impl Into<String>, explorer_url: Option<String>) -> Self {
        Self {
            success: true,
            tx_hash: Some(tx_hash.into()),
            explorer_url,
            error: None,
        }
    }

    /// A failed mint; the burn attestation remains valid for retry or
    /// manual completion.
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            tx_hash: None,
            explorer_url: None,
            error: Some(error.into()),
        }
    }
}

/// Pre-funded balance available on the gateway rail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayBalance {
    pub available: Amount,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bridge_outcome_constructors() {
        let ok = BridgeOutcome::confirmed("0xabc", None);
        assert!(ok.success);
        assert_eq!(ok.tx_status, TxStatus::Success);

        let pending = BridgeOutcome::pending(None);
        assert!(pending.success);
        assert_eq!(pending.tx_status, TxStatus::Pending);

        let failed = BridgeOutcome::failed("no liquidity");
        assert!(!failed.success);
        assert_eq!(failed.error.as_deref(), Some("no liquidity"));
    }

    #[test]
    fn test_tx_status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&TxStatus::Reverted).unwrap(),
            "\"reverted\""
        );
    }

    #[test]
    fn test_channel_id_display() {
        let id = ChannelId::new("ch-42");
        assert_eq!(id.to_string(), "ch-42");
        assert_eq!(id.as_str(), "ch-42");
    }
}
