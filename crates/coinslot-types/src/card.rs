//! Festival prepaid card records.

use serde::{Deserialize, Serialize};

use crate::{Amount, Timestamp};

/// Whether a card may be topped up or charged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CardStatus {
    Active,
    Frozen,
}

/// A reusable, PIN-protected prepaid balance bound to an NFC tag UID or an
/// operator-issued code.
///
/// Invariant: `balance == total_loaded - total_spent` at all times, and
/// `balance` never goes negative. Cards are never hard-deleted; an emptied
/// card stays enumerable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FestivalCard {
    pub wallet_id: String,
    /// Empty until the holder (or an admin) sets a PIN.
    pub pin_hash: String,
    pub balance: Amount,
    pub total_loaded: Amount,
    pub total_spent: Amount,
    pub created_at: Timestamp,
    pub last_activity_at: Timestamp,
    pub status: CardStatus,
}

impl FestivalCard {
    /// Create an empty `ACTIVE` card with no PIN.
    pub fn new(wallet_id: impl Into<String>, now: Timestamp) -> Self {
        Self {
            wallet_id: wallet_id.into(),
            pin_hash: String::new(),
            balance: Amount::ZERO,
            total_loaded: Amount::ZERO,
            total_spent: Amount::ZERO,
            created_at: now,
            last_activity_at: now,
            status: CardStatus::Active,
        }
    }

    /// True once a PIN hash has been stored.
    pub fn has_pin(&self) -> bool {
        !self.pin_hash.is_empty()
    }

    /// True while the card accepts mutations.
    pub fn is_active(&self) -> bool {
        self.status == CardStatus::Active
    }
}
