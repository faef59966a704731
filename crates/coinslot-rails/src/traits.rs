//! Rail client trait definitions.
//!
//! The settlement core drives three external services through these
//! interfaces, allowing:
//! - Real SDK-backed implementations in the kiosk binary
//! - Mock implementations for testing
//!
//! All methods are async and may fail at the transport level
//! (`Err(RailError)`) or at the protocol level (`Ok` with
//! `success == false`). Unless a flow says otherwise, the orchestrators
//! treat channel operations as best-effort and bridge/gateway operations
//! as the authoritative value movement.

use async_trait::async_trait;

use coinslot_types::Amount;

use crate::error::RailResult;
use crate::types::{
    BridgeOutcome, ChannelId, GatewayBalance, GatewayFunding, GatewayMint, GatewayTransfer,
};

/// Off-chain payment channel network.
///
/// Channels mirror the kiosk's local balances into the clearing network.
/// They are bookkeeping, not value transfer: every method here is invoked
/// best-effort, and no failure may block a cash-balance operation.
#[async_trait]
pub trait ChannelClient: Send + Sync {
    /// Open a channel for the given asset token on the given chain.
    async fn open(&self, token: &str, chain_id: u64) -> RailResult<ChannelId>;

    /// Resize an open channel to the given amount.
    async fn resize(
        &self,
        channel_id: &ChannelId,
        amount: Amount,
        destination: &str,
    ) -> RailResult<()>;

    /// Check whether a channel is still open.
    async fn exists(&self, channel_id: &ChannelId) -> RailResult<bool>;

    /// Cooperatively close a channel, releasing its balance to
    /// `destination`.
    async fn close(&self, channel_id: &ChannelId, destination: &str) -> RailResult<()>;
}

/// Cross-chain stablecoin bridge.
#[async_trait]
pub trait BridgeClient: Send + Sync {
    /// Bridge `net_amount` from the hub chain to `destination` on the
    /// chain named by `chain_key`, optionally diverting the operator fee
    /// to `fee_recipient`.
    ///
    /// Callers pass the post-fee net amount; the bridge does no fee
    /// arithmetic of its own.
    async fn transfer(
        &self,
        destination: &str,
        chain_key: &str,
        net_amount: Amount,
        fee_recipient: Option<&str>,
    ) -> RailResult<BridgeOutcome>;
}

/// Burn/mint rail with an explicit pre-funding step.
///
/// Unlike the bridge, the gateway spends from a balance the kiosk must
/// reserve up front (`ensure_balance`), and splits delivery into a burn
/// (`transfer`) that yields an attestation and a mint on the destination
/// chain that consumes it.
#[async_trait]
pub trait GatewayClient: Send + Sync {
    /// Make sure at least `required` is available on the rail, depositing
    /// the shortfall if necessary.
    async fn ensure_balance(&self, required: Amount) -> RailResult<GatewayFunding>;

    /// Burn `amount` toward `recipient` on the chain named by `chain_key`.
    async fn transfer(
        &self,
        recipient: &str,
        amount: Amount,
        chain_key: &str,
    ) -> RailResult<GatewayTransfer>;

    /// Mint on the destination chain using the attestation from a burn.
    async fn mint(
        &self,
        attestation: &str,
        signature: &str,
        chain_key: &str,
    ) -> RailResult<GatewayMint>;

    /// Current available balance on the rail.
    async fn balance(&self) -> RailResult<GatewayBalance>;
}
