//! Main KioskOperations implementation.
//!
//! This module provides the `KioskOperations` struct that owns the ledger
//! and the rail clients and exposes all kiosk flows. The flow
//! implementations live in sibling modules: sessions in `session`, the
//! card ledger in `cards`, merchant payments in `payment`, PIN wallet
//! claims in `claim`.

use std::time::{SystemTime, UNIX_EPOCH};

use coinslot_rails::{BridgeClient, ChannelClient, GatewayClient};
use coinslot_store::LedgerStore;
use coinslot_types::Timestamp;

use crate::config::KioskConfig;

/// Main operations implementation.
///
/// `KioskOperations` is generic over the three rail clients:
/// - `C`: the payment channel network
/// - `B`: the cross-chain bridge
/// - `G`: the gateway burn/mint rail
///
/// This allows real SDK adapters in production and mocks in tests while
/// keeping the same orchestration logic.
///
/// The ledger store is injected, constructed once at process start; each
/// collection locks independently inside the store, and no lock is ever
/// held across a rail call: flows persist the pre-call transition,
/// release, await the rail, then re-acquire to record the outcome.
pub struct KioskOperations<C, B, G>
where
    C: ChannelClient,
    B: BridgeClient,
    G: GatewayClient,
{
    /// The kiosk ledger: sessions, festival cards, PIN wallets.
    pub store: LedgerStore,
    /// Operations configuration.
    pub config: KioskConfig,
    /// Payment channel network client.
    pub(crate) channel: C,
    /// Bridge client.
    pub(crate) bridge: B,
    /// Gateway client.
    pub(crate) gateway: G,
}

impl<C, B, G> KioskOperations<C, B, G>
where
    C: ChannelClient,
    B: BridgeClient,
    G: GatewayClient,
{
    /// Create new KioskOperations with the given components.
    pub fn new(store: LedgerStore, config: KioskConfig, channel: C, bridge: B, gateway: G) -> Self {
        Self {
            store,
            config,
            channel,
            bridge,
            gateway,
        }
    }
}

/// Get the current timestamp in milliseconds since the UNIX epoch.
pub fn current_timestamp() -> Timestamp {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as Timestamp)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_current_timestamp_is_monotonic_enough() {
        let a = current_timestamp();
        let b = current_timestamp();
        assert!(b >= a);
        // Sanity: after 2020, before 2100
        assert!(a > 1_577_836_800_000);
        assert!(a < 4_102_444_800_000);
    }
}
