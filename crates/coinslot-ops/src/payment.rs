//! Merchant payment orchestration (festival card -> merchant).
//!
//! The payment composes a card deduction with the gateway burn/mint rail.
//! The critical correctness property is the refund asymmetry: the card is
//! refunded only while the downstream action is still reversible. Once the
//! burn has executed, the value is in flight to the merchant and a refund
//! would double-credit, so those failures are surfaced distinctly for
//! manual reconciliation instead.

use serde::Serialize;
use tracing::{error, info};

use coinslot_rails::{BridgeClient, ChannelClient, GatewayClient};
use coinslot_types::Amount;

use crate::error::{OpsError, OpsResult};
use crate::kiosk_ops::KioskOperations;

/// Result of a card -> merchant payment.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tx_hash: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explorer_url: Option<String>,
    /// Card balance after the payment (or after the refund).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_balance: Option<Amount>,
    /// True when a failed payment credited the deduction back.
    pub refunded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PaymentResult {
    fn failed(new_balance: Option<Amount>, refunded: bool, error: String) -> Self {
        Self {
            success: false,
            tx_hash: None,
            explorer_url: None,
            new_balance,
            refunded,
            error: Some(error),
        }
    }
}

impl<C, B, G> KioskOperations<C, B, G>
where
    C: ChannelClient,
    B: BridgeClient,
    G: GatewayClient,
{
    /// Pay a merchant from a festival card.
    ///
    /// Steps, each gating the next:
    /// 1. verify PIN (no state change)
    /// 2. resolve merchant (no state change)
    /// 3. check balance sufficiency (no state change)
    /// 4. deduct the card (point of no return for the card balance)
    /// 5. ensure the gateway rail is funded for amount + buffer; on
    ///    failure, refund the card
    /// 6. gateway burn toward the merchant; on failure, refund the card
    /// 7. gateway mint on the merchant's chain; on failure, do NOT refund
    ///    (the burn already happened; value is in flight, not lost)
    ///
    /// Validation failures (steps 1-3) return `Err` with no state change;
    /// anything after the deduction returns `Ok` with `success == false`
    /// so the caller always sees where the money went.
    pub async fn process_payment(
        &self,
        wallet_id: &str,
        pin: &str,
        merchant_id: &str,
        amount: Amount,
    ) -> OpsResult<PaymentResult> {
        if amount.is_zero() {
            return Err(OpsError::invalid_amount("payment must be positive"));
        }

        // 1. PIN gate
        if !self.verify_pin(wallet_id, pin)? {
            return Err(OpsError::InvalidPin);
        }

        // 2. Merchant gate
        let merchant = self
            .config
            .merchant(merchant_id)
            .ok_or_else(|| OpsError::MerchantNotFound(merchant_id.to_string()))?
            .clone();

        // 3. Balance gate
        let balance = self.get_balance(wallet_id)?;
        if !balance.exists {
            return Err(OpsError::card_not_found(wallet_id));
        }
        if amount > balance.balance {
            return Err(OpsError::InsufficientBalance {
                have: balance.balance,
                need: amount,
            });
        }

        let required = amount
            .checked_add(self.config.gateway_buffer)
            .ok_or(OpsError::Overflow)?;

        // 4. Deduct: the card's point of no return
        let deducted = self.deduct(wallet_id, amount)?;
        info!(
            wallet_id = %wallet_id,
            merchant_id = %merchant.id,
            amount = %amount,
            chain = %merchant.preferred_chain,
            "Card deducted, starting gateway payment"
        );

        // 5. Fund the rail; nothing has moved yet, so a failure refunds
        let funding = self.gateway.ensure_balance(required).await;
        let funding_error = match funding {
            Ok(f) if f.success => None,
            Ok(f) => Some(f.error.unwrap_or_else(|| "gateway funding failed".to_string())),
            Err(e) => Some(e.to_string()),
        };
        if let Some(cause) = funding_error {
            error!(wallet_id = %wallet_id, error = %cause, "Gateway funding failed after card deduction");
            let refunded = self.refund_card(wallet_id, amount);
            let new_balance = self.get_balance(wallet_id).ok().map(|b| b.balance);
            return Ok(PaymentResult::failed(
                new_balance,
                refunded,
                format!("Gateway funding failed: {cause}. Card was refunded."),
            ));
        }

        // 6. Burn; still refundable, a rejected burn moved nothing
        let transfer = self
            .gateway
            .transfer(&merchant.wallet_address, amount, &merchant.preferred_chain)
            .await;
        let transfer = match transfer {
            Ok(t) if t.success => t,
            Ok(t) => {
                let cause = t.error.unwrap_or_else(|| "gateway transfer failed".to_string());
                error!(wallet_id = %wallet_id, error = %cause, "Gateway transfer failed after card deduction");
                let refunded = self.refund_card(wallet_id, amount);
                let new_balance = self.get_balance(wallet_id).ok().map(|b| b.balance);
                return Ok(PaymentResult::failed(
                    new_balance,
                    refunded,
                    format!("Gateway transfer failed: {cause}. Card was refunded."),
                ));
            }
            Err(e) => {
                error!(wallet_id = %wallet_id, error = %e, "Gateway transfer errored after card deduction");
                let refunded = self.refund_card(wallet_id, amount);
                let new_balance = self.get_balance(wallet_id).ok().map(|b| b.balance);
                return Ok(PaymentResult::failed(
                    new_balance,
                    refunded,
                    format!("Gateway transfer failed: {e}. Card was refunded."),
                ));
            }
        };

        // Past this point the burn has executed; the card is not made
        // whole again, because the value is in flight to the merchant.
        let (attestation, signature) = match (transfer.attestation, transfer.signature) {
            (Some(a), Some(s)) => (a, s),
            _ => {
                error!(wallet_id = %wallet_id, "Gateway transfer returned no attestation");
                return Ok(PaymentResult::failed(
                    Some(deducted.new_balance),
                    false,
                    "Gateway transfer succeeded without an attestation; reconcile manually"
                        .to_string(),
                ));
            }
        };

        // 7. Mint on the merchant's chain
        let mint = self
            .gateway
            .mint(&attestation, &signature, &merchant.preferred_chain)
            .await;
        let mint = match mint {
            Ok(m) if m.success => m,
            Ok(m) => {
                let cause = m.error.unwrap_or_else(|| "gateway mint failed".to_string());
                error!(wallet_id = %wallet_id, error = %cause, "Gateway mint failed after transfer");
                return Ok(PaymentResult::failed(
                    Some(deducted.new_balance),
                    false,
                    format!("Gateway mint failed: {cause}. Transfer was submitted, may complete later."),
                ));
            }
            Err(e) => {
                error!(wallet_id = %wallet_id, error = %e, "Gateway mint errored after transfer");
                return Ok(PaymentResult::failed(
                    Some(deducted.new_balance),
                    false,
                    format!("Gateway mint failed: {e}. Transfer was submitted, may complete later."),
                ));
            }
        };

        info!(
            wallet_id = %wallet_id,
            merchant_id = %merchant.id,
            tx_hash = ?mint.tx_hash,
            "Festival payment complete"
        );
        Ok(PaymentResult {
            success: true,
            tx_hash: mint.tx_hash,
            explorer_url: mint.explorer_url,
            new_balance: Some(deducted.new_balance),
            refunded: false,
            error: None,
        })
    }

    /// Pre-funded balance available on the gateway rail, for the operator
    /// dashboard. Reports zero when the rail is unreachable.
    pub async fn gateway_balance(&self) -> Amount {
        match self.gateway.balance().await {
            Ok(balance) => balance.available,
            Err(e) => {
                error!(error = %e, "Gateway balance check failed");
                Amount::ZERO
            }
        }
    }
}
