//! PIN wallet claim orchestration (wallet -> on-chain payout).
//!
//! A PIN wallet holds value that already belongs to the user; claiming it
//! only moves the value on-chain. The channel open/close around the bridge
//! call is bookkeeping for the off-chain accounting layer, never a
//! precondition. A failed bridge leaves the wallet in `PENDING_BRIDGE`,
//! which stays claimable: the user retries with the same PIN until a
//! bridge succeeds. No retry cap is enforced here.

use serde::Serialize;
use tracing::{info, warn};

use coinslot_econ::calculate_fee;
use coinslot_rails::{
    chains, BridgeClient, BridgeOutcome, ChannelClient, ChannelId, GatewayClient,
};
use coinslot_store::StoreError;
use coinslot_types::{
    generate_pin, generate_wallet_id, hash_pin, verify_pin_hash, Amount, PinWallet, Timestamp,
    WalletStatus,
};

use crate::error::{OpsError, OpsResult};
use crate::kiosk_ops::{current_timestamp, KioskOperations};

/// Result of a PIN wallet lookup.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LookupResult {
    pub amount: Amount,
    pub message: String,
}

/// Result of a claim attempt.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimResult {
    pub success: bool,
    /// True when the accounting channel was opened for this attempt.
    pub channel_recorded: bool,
    /// The bridge outcome, when the bridge was reached.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bridge: Option<BridgeOutcome>,
    pub message: String,
}

/// Aggregate wallet counts for the operator dashboard.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletSummary {
    pub pending: usize,
    pub pending_bridge: usize,
    pub settled: usize,
    /// Value still claimable (pending + pending bridge).
    pub total_pending_value: Amount,
}

impl<C, B, G> KioskOperations<C, B, G>
where
    C: ChannelClient,
    B: BridgeClient,
    G: GatewayClient,
{
    /// Create a PIN wallet holding `amount`.
    ///
    /// Returns the wallet and the clear PIN; only the hash is stored, so
    /// this is the one chance to show the PIN to the user.
    pub(crate) fn create_pin_wallet(
        &self,
        amount: Amount,
        now: Timestamp,
    ) -> OpsResult<(PinWallet, String)> {
        let pin = generate_pin();
        loop {
            let id = generate_wallet_id();
            let wallet = PinWallet::new(&id, hash_pin(&pin), amount, now);
            match self.store.wallets.insert(wallet.clone()) {
                Ok(()) => {
                    info!(wallet_id = %id, amount = %amount, "Created PIN wallet");
                    return Ok((wallet, pin));
                }
                Err(StoreError::Duplicate(_)) => continue,
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Look up a claimable wallet's amount. Read-only.
    ///
    /// A settled or unknown wallet reports "not found" without revealing
    /// anything, and a wrong PIN never reveals the amount.
    pub fn lookup_pin_wallet(&self, wallet_id: &str, pin: &str) -> OpsResult<LookupResult> {
        let wallet = self
            .store
            .wallets
            .get(wallet_id)?
            .filter(PinWallet::is_claimable)
            .ok_or_else(|| OpsError::wallet_not_found(wallet_id))?;

        if !verify_pin_hash(&wallet.pin_hash, pin) {
            return Err(OpsError::InvalidPin);
        }

        Ok(LookupResult {
            amount: wallet.amount,
            message: format!("Wallet {wallet_id} found"),
        })
    }

    /// Claim a PIN wallet: bridge its value to `destination` on the chain
    /// named by `target_chain_key`.
    ///
    /// The destination is recorded before the bridge call so a retry after
    /// a partial failure reuses the same target. On bridge failure the
    /// wallet transitions to `PENDING_BRIDGE` and remains claimable; on
    /// success it is `SETTLED`, terminally.
    pub async fn claim_pin_wallet(
        &self,
        wallet_id: &str,
        pin: &str,
        destination: &str,
        target_chain_key: &str,
    ) -> OpsResult<ClaimResult> {
        let chain = chains::chain_by_key(target_chain_key)
            .ok_or_else(|| OpsError::unsupported_chain(target_chain_key))?;

        // Validate and record the claim target in one atomic step.
        let amount = self.update_wallet(wallet_id, |wallet| {
            if !wallet.is_claimable() {
                return Err(OpsError::wallet_not_found(wallet_id));
            }
            if !verify_pin_hash(&wallet.pin_hash, pin) {
                return Err(OpsError::InvalidPin);
            }
            wallet.destination = Some(destination.to_string());
            wallet.target_chain = Some(target_chain_key.to_string());
            Ok(wallet.amount)
        })?;

        let fee = calculate_fee(amount);
        info!(
            wallet_id = %wallet_id,
            destination = %destination,
            chain = %chain.name,
            amount = %amount,
            "Claiming PIN wallet"
        );

        // Best-effort accounting channel around the bridge call.
        let channel = match self
            .channel
            .open(&self.config.channel_token, self.config.channel_chain_id)
            .await
        {
            Ok(id) => Some(id),
            Err(e) => {
                warn!(wallet_id = %wallet_id, error = %e, "Channel open failed during claim");
                None
            }
        };
        let channel_recorded = channel.is_some();

        let outcome = self
            .bridge
            .transfer(
                destination,
                target_chain_key,
                fee.net_amount,
                self.config.fee_recipient.as_deref(),
            )
            .await;

        // Close regardless of the bridge outcome.
        if let Some(id) = channel {
            if let Err(e) = self.close_claim_channel(&id).await {
                warn!(wallet_id = %wallet_id, channel_id = %id, error = %e, "Channel close failed during claim");
            }
        }

        let now = current_timestamp();
        match outcome {
            Ok(outcome) if outcome.success => {
                self.update_wallet(wallet_id, |wallet| {
                    wallet.status = WalletStatus::Settled;
                    wallet.bridge_tx_hash = outcome.tx_hash.clone();
                    wallet.settled_at = Some(now);
                    Ok(())
                })?;
                info!(wallet_id = %wallet_id, tx_hash = ?outcome.tx_hash, "PIN wallet settled");
                Ok(ClaimResult {
                    success: true,
                    channel_recorded,
                    message: format!(
                        "Settlement complete! {} USDC sent to {}",
                        fee.net_amount, chain.name
                    ),
                    bridge: Some(outcome),
                })
            }
            Ok(outcome) => {
                let error = outcome
                    .error
                    .clone()
                    .unwrap_or_else(|| "bridge transfer failed".to_string());
                self.record_bridge_failure(wallet_id, &error, now)?;
                Ok(ClaimResult {
                    success: false,
                    channel_recorded,
                    message: format!("Bridge failed: {error}. PIN still valid for retry."),
                    bridge: Some(outcome),
                })
            }
            Err(e) => {
                let error = e.to_string();
                self.record_bridge_failure(wallet_id, &error, now)?;
                Ok(ClaimResult {
                    success: false,
                    channel_recorded,
                    bridge: None,
                    message: format!("Settlement failed: {error}. PIN still valid for retry."),
                })
            }
        }
    }

    /// Aggregate wallet counts and claimable value.
    pub fn wallet_summary(&self) -> OpsResult<WalletSummary> {
        let mut summary = WalletSummary::default();
        for wallet in self.store.wallets.list()? {
            match wallet.status {
                WalletStatus::Pending => summary.pending += 1,
                WalletStatus::PendingBridge => summary.pending_bridge += 1,
                WalletStatus::Settled => {
                    summary.settled += 1;
                    continue;
                }
            }
            summary.total_pending_value = summary
                .total_pending_value
                .checked_add(wallet.amount)
                .ok_or(OpsError::Overflow)?;
        }
        Ok(summary)
    }

    /// Record a failed bridge attempt; the wallet stays claimable.
    fn record_bridge_failure(
        &self,
        wallet_id: &str,
        error: &str,
        now: Timestamp,
    ) -> OpsResult<()> {
        warn!(wallet_id = %wallet_id, error = %error, "PIN wallet bridge attempt failed");
        self.update_wallet(wallet_id, |wallet| {
            wallet.status = WalletStatus::PendingBridge;
            wallet.bridge_attempts += 1;
            wallet.last_bridge_error = Some(error.to_string());
            wallet.last_bridge_attempt = Some(now);
            Ok(())
        })
    }

    /// Close the claim bookkeeping channel, tolerating "already closed".
    async fn close_claim_channel(&self, channel_id: &ChannelId) -> Result<(), coinslot_rails::RailError> {
        if self.channel.exists(channel_id).await? {
            self.channel
                .close(channel_id, &self.config.kiosk_address)
                .await?;
        }
        Ok(())
    }

    /// Update a wallet, mapping a missing record to `WalletNotFound`.
    fn update_wallet<R>(
        &self,
        wallet_id: &str,
        f: impl FnOnce(&mut PinWallet) -> OpsResult<R>,
    ) -> OpsResult<R> {
        self.store
            .wallets
            .update(wallet_id, f)
            .map_err(|e| match e {
                OpsError::Store(StoreError::NotFound(_)) => OpsError::wallet_not_found(wallet_id),
                other => other,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{test_ops, test_ops_with};
    use coinslot_test_utils::{BridgeMode, MockBridgeClient, MockChannelClient, MockGatewayClient};

    fn amt(s: &str) -> Amount {
        Amount::parse(s).unwrap()
    }

    /// A wallet holding 3.00 with a known PIN.
    fn seeded_wallet<Ch, Br, Gw>(ops: &KioskOperations<Ch, Br, Gw>) -> (String, String)
    where
        Ch: ChannelClient,
        Br: BridgeClient,
        Gw: GatewayClient,
    {
        let (wallet, pin) = ops
            .create_pin_wallet(amt("3.00"), current_timestamp())
            .unwrap();
        (wallet.id, pin)
    }

    #[tokio::test]
    async fn test_lookup_with_correct_pin() {
        let (ops, _dir) = test_ops();
        let (id, pin) = seeded_wallet(&ops);
        let result = ops.lookup_pin_wallet(&id, &pin).unwrap();
        assert_eq!(result.amount, amt("3.00"));
    }

    #[tokio::test]
    async fn test_lookup_with_wrong_pin_reveals_nothing() {
        let (ops, _dir) = test_ops();
        let (id, _pin) = seeded_wallet(&ops);
        let err = ops.lookup_pin_wallet(&id, "000000").unwrap_err();
        assert!(matches!(err, OpsError::InvalidPin));
        assert!(!err.to_string().contains("3.00"));
    }

    #[tokio::test]
    async fn test_lookup_unknown_wallet() {
        let (ops, _dir) = test_ops();
        let err = ops.lookup_pin_wallet("ZZZZZZ", "123456").unwrap_err();
        assert!(matches!(err, OpsError::WalletNotFound(_)));
    }

    #[tokio::test]
    async fn test_claim_settles_wallet() {
        let (ops, _dir) = test_ops();
        let bridge = ops.bridge.clone();
        let channel = ops.channel.clone();
        let (id, pin) = seeded_wallet(&ops);

        let result = ops
            .claim_pin_wallet(&id, &pin, "0xdest", "base_sepolia")
            .await
            .unwrap();
        assert!(result.success);
        assert!(result.channel_recorded);

        let wallet = ops.store.wallets.get(&id).unwrap().unwrap();
        assert_eq!(wallet.status, WalletStatus::Settled);
        assert!(wallet.bridge_tx_hash.is_some());
        assert!(wallet.settled_at.is_some());
        assert_eq!(wallet.destination.as_deref(), Some("0xdest"));

        // The bridge received the net amount under the shared fee rule.
        assert_eq!(bridge.transfers()[0].net_amount, amt("2.99997"));
        // The bookkeeping channel was opened and closed.
        assert_eq!(channel.opened().len(), 1);
        assert_eq!(channel.open_count(), 0);
    }

    #[tokio::test]
    async fn test_settled_wallet_cannot_be_claimed_again() {
        let (ops, _dir) = test_ops();
        let (id, pin) = seeded_wallet(&ops);
        ops.claim_pin_wallet(&id, &pin, "0xdest", "base_sepolia")
            .await
            .unwrap();

        let err = ops
            .claim_pin_wallet(&id, &pin, "0xdest", "base_sepolia")
            .await
            .unwrap_err();
        assert!(matches!(err, OpsError::WalletNotFound(_)));

        let err = ops.lookup_pin_wallet(&id, &pin).unwrap_err();
        assert!(matches!(err, OpsError::WalletNotFound(_)));
    }

    #[tokio::test]
    async fn test_failed_claim_is_retryable_and_preserves_amount() {
        let (ops, _dir) = test_ops_with(
            MockChannelClient::new(),
            MockBridgeClient::new().with_failure("congested"),
            MockGatewayClient::new(),
        );
        let (id, pin) = seeded_wallet(&ops);

        // Three failed attempts accumulate, none of them touch the amount.
        for attempt in 1..=3u32 {
            let result = ops
                .claim_pin_wallet(&id, &pin, "0xdest", "base_sepolia")
                .await
                .unwrap();
            assert!(!result.success);
            assert!(result.message.contains("PIN still valid"));

            let wallet = ops.store.wallets.get(&id).unwrap().unwrap();
            assert_eq!(wallet.status, WalletStatus::PendingBridge);
            assert_eq!(wallet.bridge_attempts, attempt);
            assert_eq!(wallet.amount, amt("3.00"));
            assert_eq!(wallet.last_bridge_error.as_deref(), Some("congested"));
            assert!(wallet.is_claimable());
        }

        // A later successful bridge settles it with the original target.
        ops.bridge.set_mode(BridgeMode::Succeed);
        let result = ops
            .claim_pin_wallet(&id, &pin, "0xdest", "base_sepolia")
            .await
            .unwrap();
        assert!(result.success);

        let wallet = ops.store.wallets.get(&id).unwrap().unwrap();
        assert_eq!(wallet.status, WalletStatus::Settled);
        assert_eq!(wallet.amount, amt("3.00"));
        assert_eq!(wallet.bridge_attempts, 3);
    }

    #[tokio::test]
    async fn test_bridge_error_also_leaves_wallet_claimable() {
        let (ops, _dir) = test_ops_with(
            MockChannelClient::new(),
            MockBridgeClient::new().with_error("connection reset"),
            MockGatewayClient::new(),
        );
        let (id, pin) = seeded_wallet(&ops);

        let result = ops
            .claim_pin_wallet(&id, &pin, "0xdest", "base_sepolia")
            .await
            .unwrap();
        assert!(!result.success);
        assert!(result.bridge.is_none());

        let wallet = ops.store.wallets.get(&id).unwrap().unwrap();
        assert_eq!(wallet.status, WalletStatus::PendingBridge);
        assert_eq!(wallet.bridge_attempts, 1);
    }

    #[tokio::test]
    async fn test_claim_proceeds_without_channel() {
        let (ops, _dir) = test_ops_with(
            MockChannelClient::new().with_open_failure(),
            MockBridgeClient::new(),
            MockGatewayClient::new(),
        );
        let (id, pin) = seeded_wallet(&ops);

        let result = ops
            .claim_pin_wallet(&id, &pin, "0xdest", "base_sepolia")
            .await
            .unwrap();
        assert!(result.success, "channel bookkeeping must not gate the claim");
        assert!(!result.channel_recorded);
    }

    #[tokio::test]
    async fn test_claim_validation() {
        let (ops, _dir) = test_ops();
        let (id, pin) = seeded_wallet(&ops);

        let err = ops
            .claim_pin_wallet(&id, &pin, "0xdest", "dogechain")
            .await
            .unwrap_err();
        assert!(matches!(err, OpsError::UnsupportedChain(_)));

        let err = ops
            .claim_pin_wallet(&id, "000000", "0xdest", "base_sepolia")
            .await
            .unwrap_err();
        assert!(matches!(err, OpsError::InvalidPin));

        // Neither validation failure consumed a bridge attempt.
        let wallet = ops.store.wallets.get(&id).unwrap().unwrap();
        assert_eq!(wallet.bridge_attempts, 0);
        assert_eq!(wallet.status, WalletStatus::Pending);
    }

    #[tokio::test]
    async fn test_wallet_summary() {
        let (ops, _dir) = test_ops_with(
            MockChannelClient::new(),
            MockBridgeClient::new().with_failure("congested"),
            MockGatewayClient::new(),
        );
        let (id1, pin1) = seeded_wallet(&ops);
        let (_id2, _pin2) = seeded_wallet(&ops);
        ops.claim_pin_wallet(&id1, &pin1, "0xdest", "base_sepolia")
            .await
            .unwrap();

        let summary = ops.wallet_summary().unwrap();
        assert_eq!(summary.pending, 1);
        assert_eq!(summary.pending_bridge, 1);
        assert_eq!(summary.settled, 0);
        assert_eq!(summary.total_pending_value, amt("6.00"));
    }
}
