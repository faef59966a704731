//! Cash-acceptance session records.

use serde::{Deserialize, Serialize};

use crate::{Amount, FeeBreakdown, Timestamp};

/// Lifecycle state of a kiosk session.
///
/// `Active -> Settling -> {Settled | Failed}`; the PIN-conversion path goes
/// straight from `Active` to `Settled`. Once non-active, balance fields are
/// frozen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionStatus {
    Active,
    Settling,
    Settled,
    Failed,
}

/// One cash-acceptance interaction at the kiosk.
///
/// `current_balance` is the authoritative record of accepted cash; the
/// payment channel, when one exists, is an eventually-consistent mirror.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: String,
    /// Off-chain payment channel mirroring this session, when open succeeded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_identifier: Option<String>,
    /// Sum of all deposits; monotonically non-decreasing.
    pub total_deposited: Amount,
    pub current_balance: Amount,
    pub started_at: Timestamp,
    pub last_activity_at: Timestamp,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ended_at: Option<Timestamp>,
    pub status: SessionStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination_chain: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bridge_tx_hash: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explorer_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fee: Option<FeeBreakdown>,
    /// Last best-effort failure (channel open/resize/close) or the terminal
    /// settlement error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Session {
    /// Create a fresh `ACTIVE` session with zero balance.
    pub fn new(id: impl Into<String>, user_identifier: Option<String>, now: Timestamp) -> Self {
        Self {
            id: id.into(),
            channel_id: None,
            user_identifier,
            total_deposited: Amount::ZERO,
            current_balance: Amount::ZERO,
            started_at: now,
            last_activity_at: now,
            ended_at: None,
            status: SessionStatus::Active,
            destination_address: None,
            destination_chain: None,
            bridge_tx_hash: None,
            explorer_url: None,
            fee: None,
            error: None,
        }
    }

    /// True while the session accepts deposits and terminal transitions.
    pub fn is_active(&self) -> bool {
        self.status == SessionStatus::Active
    }
}
