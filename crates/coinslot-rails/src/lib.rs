//! External settlement rail interfaces for the coinslot core.
//!
//! The settlement core moves value through three external services, each
//! consumed through a narrow trait with concrete result types:
//!
//! - [`ChannelClient`]: off-chain payment channel network (best-effort
//!   bookkeeping mirror of local balances)
//! - [`BridgeClient`]: cross-chain stablecoin bridge (session settlement
//!   and PIN wallet claims)
//! - [`GatewayClient`]: burn/mint rail with an explicit pre-funding step
//!   (festival card payments to merchants)
//!
//! # Architecture
//!
//! ```text
//! coinslot-ops                 coinslot-rails
//! ┌────────────────┐          ┌──────────────────────────┐
//! │ end_session    │ ───────► │ BridgeClient (trait)     │
//! │ claim_wallet   │          │ ChannelClient (trait)    │
//! │ process_payment│ ───────► │ GatewayClient (trait)    │
//! └────────────────┘          └────────────┬─────────────┘
//!                                          │
//!                                          ▼
//!                             bridge / clearing / gateway APIs
//! ```
//!
//! Real SDK adapters live with the kiosk binary, not here; this crate is
//! the boundary that keeps the core insulated from upstream SDK schema
//! drift. Tests run against the mocks in `coinslot-test-utils`.

pub mod chains;
pub mod error;
pub mod traits;
pub mod types;

// Re-export main types
pub use chains::{chain_by_key, hub_chain, is_supported, ChainInfo, HUB_CHAIN_KEY, SUPPORTED_CHAINS};
pub use error::{RailError, RailResult};
pub use traits::{BridgeClient, ChannelClient, GatewayClient};
pub use types::{
    BridgeOutcome, ChannelId, GatewayBalance, GatewayFunding, GatewayMint, GatewayTransfer,
    TxStatus,
};
