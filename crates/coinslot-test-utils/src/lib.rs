//! Mock rail clients for coinslot tests.
//!
//! Each mock tracks its calls in memory behind `Arc<RwLock<...>>`, so
//! clones share state and tests can hand a clone to the orchestrator while
//! keeping one for assertions. Failure modes are configured with builder
//! methods (`with_*`) or flipped at runtime (`set_*`) to script multi-step
//! scenarios such as fail-then-retry.

pub mod mock_bridge;
pub mod mock_channel;
pub mod mock_gateway;

pub use mock_bridge::{BridgeMode, BridgeTransferCall, MockBridgeClient};
pub use mock_channel::MockChannelClient;
pub use mock_gateway::{GatewayTransferCall, MockGatewayClient};
