//! Session operations implementation.
//!
//! A session tracks one cash-acceptance interaction. The local balance is
//! the authoritative record of accepted cash; the payment channel is an
//! eventually-consistent mirror. Every channel operation here is "attempt
//! and record": the kiosk never refuses or reverses accepted cash because
//! the clearing network hiccuped.

use serde::Serialize;
use tracing::{info, warn};

use coinslot_econ::calculate_fee;
use coinslot_rails::{chains, BridgeClient, ChannelClient, ChannelId, GatewayClient};
use coinslot_store::StoreError;
use coinslot_types::{Amount, FeeBreakdown, Session, SessionStatus};

use crate::error::{OpsError, OpsResult};
use crate::kiosk_ops::{current_timestamp, KioskOperations};

/// Result of starting a session.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStartResult {
    pub session_id: String,
    /// Set when the best-effort channel open succeeded.
    pub channel_id: Option<ChannelId>,
    pub message: String,
}

/// Result of a cash deposit.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionDepositResult {
    pub new_balance: Amount,
    pub total_deposited: Amount,
    /// False when the channel resize failed; the ledger balance above is
    /// still committed.
    pub channel_synced: bool,
    pub message: String,
}

/// Result of ending a session via the bridge.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionEndResult {
    pub success: bool,
    /// Net amount delivered on-chain; zero when the bridge failed.
    pub settled_amount: Amount,
    pub fee: FeeBreakdown,
    pub bridge_tx_hash: Option<String>,
    pub explorer_url: Option<String>,
    pub destination_chain: String,
    pub message: String,
}

/// Result of converting a session into a PIN wallet.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionPinResult {
    pub pin: String,
    pub wallet_id: String,
    pub amount: Amount,
    pub message: String,
}

/// Aggregate session counts for the operator dashboard.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub active: usize,
    pub settling: usize,
    pub settled: usize,
    pub failed: usize,
    /// Cash held by currently active sessions.
    pub total_active_value: Amount,
}

impl<C, B, G> KioskOperations<C, B, G>
where
    C: ChannelClient,
    B: BridgeClient,
    G: GatewayClient,
{
    /// Start a new kiosk session.
    ///
    /// A channel open is attempted so the clearing network can mirror the
    /// session balance, but the session is created `ACTIVE` either way;
    /// deposits accumulate locally even with no channel.
    pub async fn start_session(
        &self,
        user_identifier: Option<String>,
    ) -> OpsResult<SessionStartResult> {
        let session_id = coinslot_types::generate_session_id();
        let now = current_timestamp();
        info!(session_id = %session_id, "Starting new kiosk session");

        let mut session = Session::new(&session_id, user_identifier, now);

        let channel_id = match self
            .channel
            .open(&self.config.channel_token, self.config.channel_chain_id)
            .await
        {
            Ok(id) => {
                session.channel_id = Some(id.as_str().to_string());
                Some(id)
            }
            Err(e) => {
                warn!(session_id = %session_id, error = %e, "Channel open failed, continuing without channel");
                session.error = Some(format!("channel open failed: {e}"));
                None
            }
        };

        self.store.sessions.insert(session)?;

        let message = format!("Session {session_id} started. Ready for coin deposits.");
        Ok(SessionStartResult {
            session_id,
            channel_id,
            message,
        })
    }

    /// Add funds to an active session (user inserted cash).
    ///
    /// The ledger balance is committed first; a channel resize is then
    /// attempted to mirror it and surfaced via `channel_synced` but never
    /// rolls the balance back.
    pub async fn deposit_to_session(
        &self,
        session_id: &str,
        amount: Amount,
    ) -> OpsResult<SessionDepositResult> {
        if amount.is_zero() {
            return Err(OpsError::invalid_amount("deposit must be positive"));
        }
        let now = current_timestamp();

        let (new_balance, total_deposited, channel_id) =
            self.update_session(session_id, |session| {
                if !session.is_active() {
                    return Err(OpsError::SessionNotActive(session.id.clone()));
                }
                session.current_balance = session
                    .current_balance
                    .checked_add(amount)
                    .ok_or(OpsError::Overflow)?;
                session.total_deposited = session
                    .total_deposited
                    .checked_add(amount)
                    .ok_or(OpsError::Overflow)?;
                session.last_activity_at = now;
                Ok((
                    session.current_balance,
                    session.total_deposited,
                    session.channel_id.clone(),
                ))
            })?;

        info!(session_id = %session_id, amount = %amount, balance = %new_balance, "Processed cash deposit");

        let mut channel_synced = true;
        if let Some(id) = channel_id {
            let channel = ChannelId::new(id);
            if let Err(e) = self
                .channel
                .resize(&channel, new_balance, &self.config.kiosk_address)
                .await
            {
                warn!(session_id = %session_id, channel_id = %channel, error = %e, "Channel resize failed");
                channel_synced = false;
                self.record_session_error(session_id, format!("channel resize failed: {e}"));
            }
        }

        Ok(SessionDepositResult {
            new_balance,
            total_deposited,
            channel_synced,
            message: format!("Deposited {amount} USDC. Session balance: {new_balance}"),
        })
    }

    /// End a session, bridging its net balance to `destination` on the
    /// chain named by `target_chain_key`.
    ///
    /// The session is marked `SETTLING` and persisted before the bridge
    /// call; on bridge failure it becomes `FAILED` and is not retried;
    /// the user falls back to an alternate path such as
    /// [`session_to_pin`](Self::session_to_pin).
    pub async fn end_session(
        &self,
        session_id: &str,
        destination: &str,
        target_chain_key: &str,
    ) -> OpsResult<SessionEndResult> {
        let chain = chains::chain_by_key(target_chain_key)
            .ok_or_else(|| OpsError::unsupported_chain(target_chain_key))?;
        let now = current_timestamp();

        let (fee, channel_id) = self.update_session(session_id, |session| {
            if !session.is_active() {
                return Err(OpsError::SessionNotActive(session.id.clone()));
            }
            if session.current_balance.is_zero() {
                return Err(OpsError::NoBalance(session.id.clone()));
            }
            let fee = calculate_fee(session.current_balance);
            session.status = SessionStatus::Settling;
            session.destination_address = Some(destination.to_string());
            session.destination_chain = Some(target_chain_key.to_string());
            session.fee = Some(fee.clone());
            session.last_activity_at = now;
            Ok((fee, session.channel_id.clone()))
        })?;

        info!(
            session_id = %session_id,
            destination = %destination,
            chain = %chain.name,
            gross = %fee.gross_amount,
            net = %fee.net_amount,
            "Ending session"
        );

        if let Some(id) = channel_id {
            if let Some(error) = self.close_channel_best_effort(&ChannelId::new(id)).await {
                self.record_session_error(session_id, error);
            }
        }

        let outcome = self
            .bridge
            .transfer(
                destination,
                target_chain_key,
                fee.net_amount,
                self.config.fee_recipient.as_deref(),
            )
            .await;

        let ended = current_timestamp();
        match outcome {
            Ok(outcome) if outcome.success => {
                self.update_session(session_id, |session| {
                    session.status = SessionStatus::Settled;
                    session.bridge_tx_hash = outcome.tx_hash.clone();
                    session.explorer_url = outcome.explorer_url.clone();
                    session.ended_at = Some(ended);
                    Ok(())
                })?;
                info!(session_id = %session_id, tx_hash = ?outcome.tx_hash, "Session settled");
                Ok(SessionEndResult {
                    success: true,
                    settled_amount: fee.net_amount,
                    message: format!(
                        "Session settled! {} USDC sent to {}",
                        fee.net_amount, chain.name
                    ),
                    fee,
                    bridge_tx_hash: outcome.tx_hash,
                    explorer_url: outcome.explorer_url,
                    destination_chain: chain.name.to_string(),
                })
            }
            Ok(outcome) => {
                let error = outcome
                    .error
                    .unwrap_or_else(|| "bridge transfer failed".to_string());
                self.fail_session(session_id, &error, ended)?;
                Ok(SessionEndResult {
                    success: false,
                    settled_amount: Amount::ZERO,
                    fee,
                    bridge_tx_hash: None,
                    explorer_url: None,
                    destination_chain: chain.name.to_string(),
                    message: format!("Bridge failed: {error}"),
                })
            }
            Err(e) => {
                let error = e.to_string();
                self.fail_session(session_id, &error, ended)?;
                Ok(SessionEndResult {
                    success: false,
                    settled_amount: Amount::ZERO,
                    fee,
                    bridge_tx_hash: None,
                    explorer_url: None,
                    destination_chain: chain.name.to_string(),
                    message: format!("Settlement failed: {error}"),
                })
            }
        }
    }

    /// Convert a session's balance into a PIN wallet (user has no wallet
    /// yet; they claim later with PIN + destination).
    ///
    /// The channel close is best-effort: cash must never be stranded
    /// behind the clearing network, so a close failure is recorded on the
    /// session and the conversion proceeds.
    pub async fn session_to_pin(&self, session_id: &str) -> OpsResult<SessionPinResult> {
        let session = self
            .store
            .sessions
            .get(session_id)?
            .ok_or_else(|| OpsError::session_not_found(session_id))?;
        if !session.is_active() {
            return Err(OpsError::SessionNotActive(session_id.to_string()));
        }
        if session.current_balance.is_zero() {
            return Err(OpsError::NoBalance(session_id.to_string()));
        }

        let mut close_error = None;
        if let Some(id) = &session.channel_id {
            close_error = self.close_channel_best_effort(&ChannelId::new(id.as_str())).await;
        }

        let now = current_timestamp();
        let (pin, wallet_id, amount) = self.update_session(session_id, |session| {
            if !session.is_active() {
                return Err(OpsError::SessionNotActive(session.id.clone()));
            }
            let amount = session.current_balance;
            if amount.is_zero() {
                return Err(OpsError::NoBalance(session.id.clone()));
            }
            let (wallet, pin) = self.create_pin_wallet(amount, now)?;
            session.status = SessionStatus::Settled;
            session.ended_at = Some(now);
            session.last_activity_at = now;
            if let Some(e) = close_error.take() {
                session.error = Some(e);
            }
            Ok((pin, wallet.id, amount))
        })?;

        info!(session_id = %session_id, wallet_id = %wallet_id, amount = %amount, "Converted session to PIN wallet");

        Ok(SessionPinResult {
            pin: pin.clone(),
            wallet_id,
            amount,
            message: format!("Session converted to PIN wallet. PIN: {pin}"),
        })
    }

    /// Aggregate session counts and active cash value.
    pub fn session_summary(&self) -> OpsResult<SessionSummary> {
        let mut summary = SessionSummary::default();
        for session in self.store.sessions.list()? {
            match session.status {
                SessionStatus::Active => {
                    summary.active += 1;
                    summary.total_active_value = summary
                        .total_active_value
                        .checked_add(session.current_balance)
                        .ok_or(OpsError::Overflow)?;
                }
                SessionStatus::Settling => summary.settling += 1,
                SessionStatus::Settled => summary.settled += 1,
                SessionStatus::Failed => summary.failed += 1,
            }
        }
        Ok(summary)
    }

    /// Update a session, mapping a missing record to `SessionNotFound`.
    pub(crate) fn update_session<R>(
        &self,
        session_id: &str,
        f: impl FnOnce(&mut Session) -> OpsResult<R>,
    ) -> OpsResult<R> {
        self.store
            .sessions
            .update(session_id, f)
            .map_err(|e| match e {
                OpsError::Store(StoreError::NotFound(_)) => {
                    OpsError::session_not_found(session_id)
                }
                other => other,
            })
    }

    /// Mark a session terminally failed with the given error.
    fn fail_session(
        &self,
        session_id: &str,
        error: &str,
        ended: coinslot_types::Timestamp,
    ) -> OpsResult<()> {
        warn!(session_id = %session_id, error = %error, "Session settlement failed");
        self.update_session(session_id, |session| {
            session.status = SessionStatus::Failed;
            session.error = Some(error.to_string());
            session.ended_at = Some(ended);
            Ok(())
        })
    }

    /// Record a best-effort failure on the session without failing the
    /// caller.
    fn record_session_error(&self, session_id: &str, error: String) {
        let recorded = self.update_session(session_id, |session| {
            session.error = Some(error.clone());
            Ok(())
        });
        if let Err(e) = recorded {
            warn!(session_id = %session_id, error = %e, "Could not record session error");
        }
    }

    /// Close a channel if it is still open, tolerating "already closed".
    ///
    /// Returns a description of the failure, if any, for the caller to
    /// record; never an error.
    async fn close_channel_best_effort(&self, channel_id: &ChannelId) -> Option<String> {
        match self.channel.exists(channel_id).await {
            Ok(false) => None,
            Ok(true) => match self
                .channel
                .close(channel_id, &self.config.kiosk_address)
                .await
            {
                Ok(()) => None,
                Err(e) => {
                    warn!(channel_id = %channel_id, error = %e, "Channel close failed");
                    Some(format!("channel close failed: {e}"))
                }
            },
            Err(e) => {
                warn!(channel_id = %channel_id, error = %e, "Channel status check failed");
                Some(format!("channel status check failed: {e}"))
            }
        }
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

    #[tokio::test]
    async fn test_start_session_opens_channel() {
        let (ops, _dir) = test_ops();
        let result = ops.start_session(None).await.unwrap();
        assert!(result.channel_id.is_some());

        let session = ops.store.sessions.get(&result.session_id).unwrap().unwrap();
        assert!(session.is_active());
        assert!(session.channel_id.is_some());
        assert!(session.error.is_none());
    }

    #[tokio::test]
    async fn test_start_session_survives_channel_open_failure() {
        let (ops, _dir) = test_ops_with(
            MockChannelClient::new().with_open_failure(),
            MockBridgeClient::new(),
            MockGatewayClient::new(),
        );
        let result = ops.start_session(Some("alice".into())).await.unwrap();
        assert!(result.channel_id.is_none());

        let session = ops.store.sessions.get(&result.session_id).unwrap().unwrap();
        assert!(session.is_active());
        assert!(session.channel_id.is_none());
        assert!(session.error.as_deref().unwrap().contains("channel open failed"));
    }

    #[tokio::test]
    async fn test_deposit_accumulates() {
        let (ops, _dir) = test_ops();
        let start = ops.start_session(None).await.unwrap();

        let d1 = ops
            .deposit_to_session(&start.session_id, amt("1.00"))
            .await
            .unwrap();
        assert_eq!(d1.new_balance, amt("1.00"));

        let d2 = ops
            .deposit_to_session(&start.session_id, amt("1.00"))
            .await
            .unwrap();
        assert_eq!(d2.new_balance, amt("2.00"));
        assert_eq!(d2.total_deposited, amt("2.00"));
        assert!(d2.channel_synced);
    }

    #[tokio::test]
    async fn test_deposit_rejects_zero_and_unknown_session() {
        let (ops, _dir) = test_ops();
        let start = ops.start_session(None).await.unwrap();

        let err = ops
            .deposit_to_session(&start.session_id, Amount::ZERO)
            .await
            .unwrap_err();
        assert!(matches!(err, OpsError::InvalidAmount(_)));

        let err = ops
            .deposit_to_session("S404", amt("1.00"))
            .await
            .unwrap_err();
        assert!(matches!(err, OpsError::SessionNotFound(_)));
    }

    #[tokio::test]
    async fn test_deposit_commits_balance_when_resize_fails() {
        let (ops, _dir) = test_ops_with(
            MockChannelClient::new().with_resize_failure(),
            MockBridgeClient::new(),
            MockGatewayClient::new(),
        );
        let start = ops.start_session(None).await.unwrap();
        let result = ops
            .deposit_to_session(&start.session_id, amt("2.50"))
            .await
            .unwrap();

        assert!(!result.channel_synced);
        assert_eq!(result.new_balance, amt("2.50"));
        let session = ops.store.sessions.get(&start.session_id).unwrap().unwrap();
        assert_eq!(session.current_balance, amt("2.50"));
        assert!(session.error.as_deref().unwrap().contains("resize failed"));
    }

    #[tokio::test]
    async fn test_end_session_settles_net_amount() {
        let (ops, _dir) = test_ops();
        let bridge = ops.bridge.clone();
        let start = ops.start_session(None).await.unwrap();
        ops.deposit_to_session(&start.session_id, amt("100"))
            .await
            .unwrap();

        let result = ops
            .end_session(&start.session_id, "0xdest", "base_sepolia")
            .await
            .unwrap();
        assert!(result.success);
        assert_eq!(result.settled_amount, amt("99.999"));
        assert_eq!(result.fee.fee, amt("0.001"));
        assert!(result.bridge_tx_hash.is_some());

        // The bridge saw the net amount, never the gross.
        let transfers = bridge.transfers();
        assert_eq!(transfers.len(), 1);
        assert_eq!(transfers[0].net_amount, amt("99.999"));

        let session = ops.store.sessions.get(&start.session_id).unwrap().unwrap();
        assert_eq!(session.status, SessionStatus::Settled);
        assert!(session.ended_at.is_some());
        // Balance fields frozen at their pre-settlement values.
        assert_eq!(session.current_balance, amt("100"));
    }

    #[tokio::test]
    async fn test_end_session_closes_channel_first() {
        let (ops, _dir) = test_ops();
        let channel = ops.channel.clone();
        let start = ops.start_session(None).await.unwrap();
        ops.deposit_to_session(&start.session_id, amt("5.00"))
            .await
            .unwrap();
        ops.end_session(&start.session_id, "0xdest", "base_sepolia")
            .await
            .unwrap();
        assert_eq!(channel.closes().len(), 1);
        assert_eq!(channel.open_count(), 0);
    }

    #[tokio::test]
    async fn test_end_session_bridge_failure_is_terminal() {
        let (ops, _dir) = test_ops_with(
            MockChannelClient::new(),
            MockBridgeClient::new().with_failure("no liquidity"),
            MockGatewayClient::new(),
        );
        let start = ops.start_session(None).await.unwrap();
        ops.deposit_to_session(&start.session_id, amt("1.00"))
            .await
            .unwrap();
        ops.deposit_to_session(&start.session_id, amt("1.00"))
            .await
            .unwrap();

        let result = ops
            .end_session(&start.session_id, "0xdest", "base_sepolia")
            .await
            .unwrap();
        assert!(!result.success);
        assert_eq!(result.settled_amount, Amount::ZERO);
        assert!(result.message.contains("no liquidity"));

        let session = ops.store.sessions.get(&start.session_id).unwrap().unwrap();
        assert_eq!(session.status, SessionStatus::Failed);
        assert_eq!(session.error.as_deref(), Some("no liquidity"));

        // FAILED is terminal: the session no longer accepts an end.
        let err = ops
            .end_session(&start.session_id, "0xdest", "base_sepolia")
            .await
            .unwrap_err();
        assert!(matches!(err, OpsError::SessionNotActive(_)));
    }

    #[tokio::test]
    async fn test_end_session_bridge_error_is_terminal_too() {
        let (ops, _dir) = test_ops_with(
            MockChannelClient::new(),
            MockBridgeClient::new().with_error("connection reset"),
            MockGatewayClient::new(),
        );
        let start = ops.start_session(None).await.unwrap();
        ops.deposit_to_session(&start.session_id, amt("2.00"))
            .await
            .unwrap();

        let result = ops
            .end_session(&start.session_id, "0xdest", "base_sepolia")
            .await
            .unwrap();
        assert!(!result.success);
        let session = ops.store.sessions.get(&start.session_id).unwrap().unwrap();
        assert_eq!(session.status, SessionStatus::Failed);
    }

    #[tokio::test]
    async fn test_end_session_validation() {
        let (ops, _dir) = test_ops();
        let start = ops.start_session(None).await.unwrap();

        // No balance yet
        let err = ops
            .end_session(&start.session_id, "0xdest", "base_sepolia")
            .await
            .unwrap_err();
        assert!(matches!(err, OpsError::NoBalance(_)));

        // Unknown chain
        ops.deposit_to_session(&start.session_id, amt("1.00"))
            .await
            .unwrap();
        let err = ops
            .end_session(&start.session_id, "0xdest", "dogechain")
            .await
            .unwrap_err();
        assert!(matches!(err, OpsError::UnsupportedChain(_)));

        // Still active after both validation failures
        let session = ops.store.sessions.get(&start.session_id).unwrap().unwrap();
        assert!(session.is_active());
    }

    #[tokio::test]
    async fn test_pending_bridge_outcome_counts_as_settled() {
        let (ops, _dir) = test_ops();
        ops.bridge.set_mode(BridgeMode::Pending);
        let start = ops.start_session(None).await.unwrap();
        ops.deposit_to_session(&start.session_id, amt("4.00"))
            .await
            .unwrap();

        let result = ops
            .end_session(&start.session_id, "0xdest", "base_sepolia")
            .await
            .unwrap();
        assert!(result.success);
        let session = ops.store.sessions.get(&start.session_id).unwrap().unwrap();
        assert_eq!(session.status, SessionStatus::Settled);
    }

    #[tokio::test]
    async fn test_session_to_pin_creates_claimable_wallet() {
        let (ops, _dir) = test_ops();
        let start = ops.start_session(None).await.unwrap();
        ops.deposit_to_session(&start.session_id, amt("3.00"))
            .await
            .unwrap();

        let result = ops.session_to_pin(&start.session_id).await.unwrap();
        assert_eq!(result.pin.len(), 6);
        assert_eq!(result.wallet_id.len(), 6);
        assert_eq!(result.amount, amt("3.00"));

        let wallet = ops.store.wallets.get(&result.wallet_id).unwrap().unwrap();
        assert!(wallet.is_claimable());
        assert_eq!(wallet.amount, amt("3.00"));

        let session = ops.store.sessions.get(&start.session_id).unwrap().unwrap();
        assert_eq!(session.status, SessionStatus::Settled);
    }

    #[tokio::test]
    async fn test_session_to_pin_survives_channel_close_failure() {
        let (ops, _dir) = test_ops_with(
            MockChannelClient::new().with_close_failure(),
            MockBridgeClient::new(),
            MockGatewayClient::new(),
        );
        let start = ops.start_session(None).await.unwrap();
        ops.deposit_to_session(&start.session_id, amt("3.00"))
            .await
            .unwrap();

        let result = ops.session_to_pin(&start.session_id).await.unwrap();
        assert!(ops.store.wallets.get(&result.wallet_id).unwrap().is_some());

        let session = ops.store.sessions.get(&start.session_id).unwrap().unwrap();
        assert_eq!(session.status, SessionStatus::Settled);
        assert!(session.error.as_deref().unwrap().contains("close failed"));
    }

    #[tokio::test]
    async fn test_session_to_pin_requires_balance() {
        let (ops, _dir) = test_ops();
        let start = ops.start_session(None).await.unwrap();
        let err = ops.session_to_pin(&start.session_id).await.unwrap_err();
        assert!(matches!(err, OpsError::NoBalance(_)));
    }

    #[tokio::test]
    async fn test_session_summary() {
        let (ops, _dir) = test_ops();
        let s1 = ops.start_session(None).await.unwrap();
        ops.deposit_to_session(&s1.session_id, amt("2.00"))
            .await
            .unwrap();
        let s2 = ops.start_session(None).await.unwrap();
        ops.deposit_to_session(&s2.session_id, amt("1.00"))
            .await
            .unwrap();
        ops.end_session(&s2.session_id, "0xdest", "base_sepolia")
            .await
            .unwrap();

        let summary = ops.session_summary().unwrap();
        assert_eq!(summary.active, 1);
        assert_eq!(summary.settled, 1);
        assert_eq!(summary.total_active_value, amt("2.00"));
    }
}
