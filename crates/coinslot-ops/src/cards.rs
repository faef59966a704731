//! Festival card ledger implementation.
//!
//! Balance ledger for reusable prepaid cards. All mutations run inside the
//! card collection's update closure, so the `balance == total_loaded -
//! total_spent` invariant and the no-overdraft guard hold under concurrent
//! requests against the same card.

use serde::Serialize;
use tracing::{info, warn};

use coinslot_rails::{BridgeClient, ChannelClient, GatewayClient};
use coinslot_store::StoreError;
use coinslot_types::{hash_pin, verify_pin_hash, Amount, CardStatus, FestivalCard};

use crate::error::{OpsError, OpsResult};
use crate::kiosk_ops::{current_timestamp, KioskOperations};

/// Result of creating (or re-touching) a card.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardCreateResult {
    pub wallet_id: String,
    /// False when the card already existed; nothing was mutated.
    pub created: bool,
}

/// Result of a top-up.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopUpResult {
    pub new_balance: Amount,
    pub total_loaded: Amount,
    pub message: String,
}

/// Result of a deduction.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeductResult {
    pub new_balance: Amount,
    pub total_spent: Amount,
    pub message: String,
}

/// Balance query result.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceResult {
    pub balance: Amount,
    pub exists: bool,
}

/// Aggregate card totals for the operator dashboard.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardSummary {
    pub total_cards: usize,
    pub total_balance: Amount,
    pub total_loaded: Amount,
    pub total_spent: Amount,
}

impl<C, B, G> KioskOperations<C, B, G>
where
    C: ChannelClient,
    B: BridgeClient,
    G: GatewayClient,
{
    /// Create a card, generating a collision-checked id when none is
    /// supplied (admin flows pass an NFC tag UID or a printed code).
    ///
    /// Idempotent: creating an existing id returns it without touching the
    /// stored card's balance or PIN.
    pub fn create_card(&self, specific_id: Option<&str>) -> OpsResult<CardCreateResult> {
        let now = current_timestamp();

        if let Some(id) = specific_id.filter(|id| !id.is_empty()) {
            let (card, created) = self
                .store
                .cards
                .get_or_insert(FestivalCard::new(id, now))?;
            if created {
                info!(wallet_id = %card.wallet_id, "Festival card created");
            }
            return Ok(CardCreateResult {
                wallet_id: card.wallet_id,
                created,
            });
        }

        loop {
            let id = coinslot_types::generate_wallet_id();
            let (card, created) = self
                .store
                .cards
                .get_or_insert(FestivalCard::new(&id, now))?;
            if created {
                info!(wallet_id = %card.wallet_id, "Festival card created");
                return Ok(CardCreateResult {
                    wallet_id: card.wallet_id,
                    created: true,
                });
            }
            // Drew an id that is already taken; redraw.
        }
    }

    /// Set (or overwrite) a card's PIN.
    ///
    /// There is no distinction between first set and reset, and no
    /// re-authentication; the admin flow uses this for lost-PIN recovery.
    pub fn set_pin(&self, wallet_id: &str, pin: &str) -> OpsResult<()> {
        if pin.is_empty() {
            return Err(OpsError::InvalidPin);
        }
        let now = current_timestamp();
        self.update_card(wallet_id, |card| {
            card.pin_hash = hash_pin(pin);
            card.last_activity_at = now;
            Ok(())
        })?;
        info!(wallet_id = %wallet_id, "Festival card PIN set");
        Ok(())
    }

    /// Check a PIN. False when the card is unknown or has no PIN yet.
    pub fn verify_pin(&self, wallet_id: &str, pin: &str) -> OpsResult<bool> {
        let card = self.store.cards.get(wallet_id)?;
        Ok(card
            .map(|c| verify_pin_hash(&c.pin_hash, pin))
            .unwrap_or(false))
    }

    /// Load value onto a card.
    ///
    /// No PIN is required: cards may be pre-funded by an admin before the
    /// holder sets one.
    pub fn top_up(&self, wallet_id: &str, amount: Amount) -> OpsResult<TopUpResult> {
        if amount.is_zero() {
            return Err(OpsError::invalid_amount("top-up must be positive"));
        }
        let now = current_timestamp();

        let (new_balance, total_loaded) = self.update_card(wallet_id, |card| {
            if card.status != CardStatus::Active {
                return Err(OpsError::CardFrozen(card.wallet_id.clone()));
            }
            card.balance = card.balance.checked_add(amount).ok_or(OpsError::Overflow)?;
            card.total_loaded = card
                .total_loaded
                .checked_add(amount)
                .ok_or(OpsError::Overflow)?;
            card.last_activity_at = now;
            Ok((card.balance, card.total_loaded))
        })?;

        info!(wallet_id = %wallet_id, amount = %amount, balance = %new_balance, "Festival card topped up");
        Ok(TopUpResult {
            new_balance,
            total_loaded,
            message: format!("Added {amount} USDC"),
        })
    }

    /// Charge a card.
    ///
    /// Fails without any state change when the card is unknown, frozen,
    /// has no PIN set, or the amount exceeds the balance. No partial
    /// deduction, no overdraft.
    pub fn deduct(&self, wallet_id: &str, amount: Amount) -> OpsResult<DeductResult> {
        if amount.is_zero() {
            return Err(OpsError::invalid_amount("deduction must be positive"));
        }
        let now = current_timestamp();

        let (new_balance, total_spent) = self.update_card(wallet_id, |card| {
            if card.status != CardStatus::Active {
                return Err(OpsError::CardFrozen(card.wallet_id.clone()));
            }
            if !card.has_pin() {
                return Err(OpsError::PinNotSet(card.wallet_id.clone()));
            }
            if amount > card.balance {
                return Err(OpsError::InsufficientBalance {
                    have: card.balance,
                    need: amount,
                });
            }
            card.balance = card
                .balance
                .checked_sub(amount)
                .ok_or(OpsError::Overflow)?;
            card.total_spent = card
                .total_spent
                .checked_add(amount)
                .ok_or(OpsError::Overflow)?;
            card.last_activity_at = now;
            Ok((card.balance, card.total_spent))
        })?;

        info!(wallet_id = %wallet_id, amount = %amount, balance = %new_balance, "Festival card deducted");
        Ok(DeductResult {
            new_balance,
            total_spent,
            message: format!("Deducted {amount} USDC"),
        })
    }

    /// Balance query that distinguishes "no such card" from "empty card".
    pub fn get_balance(&self, wallet_id: &str) -> OpsResult<BalanceResult> {
        match self.store.cards.get(wallet_id)? {
            Some(card) => Ok(BalanceResult {
                balance: card.balance,
                exists: true,
            }),
            None => Ok(BalanceResult {
                balance: Amount::ZERO,
                exists: false,
            }),
        }
    }

    /// Aggregate totals across all cards ever created.
    pub fn card_summary(&self) -> OpsResult<CardSummary> {
        let mut summary = CardSummary::default();
        for card in self.store.cards.list()? {
            summary.total_cards += 1;
            summary.total_balance = summary
                .total_balance
                .checked_add(card.balance)
                .ok_or(OpsError::Overflow)?;
            summary.total_loaded = summary
                .total_loaded
                .checked_add(card.total_loaded)
                .ok_or(OpsError::Overflow)?;
            summary.total_spent = summary
                .total_spent
                .checked_add(card.total_spent)
                .ok_or(OpsError::Overflow)?;
        }
        Ok(summary)
    }

    /// Compensating credit after a failed downstream payment step.
    ///
    /// Deliberately a top-up, so the totals keep the debit-then-credit
    /// pair visible while the net balance returns to its pre-payment
    /// value. Returns whether the refund landed.
    pub(crate) fn refund_card(&self, wallet_id: &str, amount: Amount) -> bool {
        match self.top_up(wallet_id, amount) {
            Ok(_) => {
                info!(wallet_id = %wallet_id, amount = %amount, "Card refunded");
                true
            }
            Err(e) => {
                warn!(wallet_id = %wallet_id, amount = %amount, error = %e, "Card refund failed");
                false
            }
        }
    }

    /// Update a card, mapping a missing record to `CardNotFound`.
    pub(crate) fn update_card<R>(
        &self,
        wallet_id: &str,
        f: impl FnOnce(&mut FestivalCard) -> OpsResult<R>,
    ) -> OpsResult<R> {
        self.store.cards.update(wallet_id, f).map_err(|e| match e {
            OpsError::Store(StoreError::NotFound(_)) => OpsError::card_not_found(wallet_id),
            other => other,
        })
    }
}
