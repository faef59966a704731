//! Mock implementation of the `BridgeClient` trait.

use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use coinslot_rails::{chain_by_key, BridgeClient, BridgeOutcome, RailError, RailResult};
use coinslot_types::Amount;

/// How the mock responds to `transfer`.
#[derive(Debug, Clone)]
pub enum BridgeMode {
    /// Confirmed transfer with a fresh mock tx hash.
    Succeed,
    /// Accepted transfer still pending on the destination.
    Pending,
    /// Explicit protocol failure (`Ok` with `success == false`).
    Fail(String),
    /// Transport failure (`Err(RailError)`).
    Error(String),
}

/// One recorded `transfer` call.
#[derive(Debug, Clone, PartialEq)]
pub struct BridgeTransferCall {
    pub destination: String,
    pub chain_key: String,
    pub net_amount: Amount,
    pub fee_recipient: Option<String>,
}

struct MockBridgeInner {
    mode: BridgeMode,
    transfers: Vec<BridgeTransferCall>,
    tx_counter: u64,
}

/// A mock implementation of the `BridgeClient` trait for testing.
///
/// Records every transfer and answers according to the configured
/// [`BridgeMode`]. Cheap to clone; all clones share the same state.
#[derive(Clone)]
pub struct MockBridgeClient {
    inner: Arc<RwLock<MockBridgeInner>>,
}

impl Default for MockBridgeClient {
    fn default() -> Self {
        Self::new()
    }
}

impl MockBridgeClient {
    /// Create a mock where every transfer confirms.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(MockBridgeInner {
                mode: BridgeMode::Succeed,
                transfers: Vec::new(),
                tx_counter: 0,
            })),
        }
    }

    /// Configure explicit transfer failures.
    pub fn with_failure(self, error: impl Into<String>) -> Self {
        self.set_mode(BridgeMode::Fail(error.into()));
        self
    }

    /// Configure transport-level errors.
    pub fn with_error(self, error: impl Into<String>) -> Self {
        self.set_mode(BridgeMode::Error(error.into()));
        self
    }

    /// Configure pending (accepted, unconfirmed) outcomes.
    pub fn with_pending(self) -> Self {
        self.set_mode(BridgeMode::Pending);
        self
    }

    /// Change the response mode at runtime, e.g. fail-then-succeed.
    pub fn set_mode(&self, mode: BridgeMode) {
        self.inner.write().unwrap().mode = mode;
    }

    // =========================================================================
    // Assertion Helpers
    // =========================================================================

    /// Every recorded transfer, in order.
    pub fn transfers(&self) -> Vec<BridgeTransferCall> {
        self.inner.read().unwrap().transfers.clone()
    }

    /// Number of transfer attempts.
    pub fn transfer_count(&self) -> usize {
        self.inner.read().unwrap().transfers.len()
    }
}

#[async_trait]
impl BridgeClient for MockBridgeClient {
    async fn transfer(
        &self,
        destination: &str,
        chain_key: &str,
        net_amount: Amount,
        fee_recipient: Option<&str>,
    ) -> RailResult<BridgeOutcome> {
        let chain = chain_by_key(chain_key)
            .ok_or_else(|| RailError::unsupported_chain(chain_key))?;

        let mut inner = self.inner.write().unwrap();
        inner.transfers.push(BridgeTransferCall {
            destination: destination.to_string(),
            chain_key: chain_key.to_string(),
            net_amount,
            fee_recipient: fee_recipient.map(str::to_string),
        });

        match inner.mode.clone() {
            BridgeMode::Succeed => {
                inner.tx_counter += 1;
                let tx_hash = format!("0xbridge{:04x}", inner.tx_counter);
                let url = chain.tx_url(&tx_hash);
                Ok(BridgeOutcome::confirmed(tx_hash, Some(url)))
            }
            BridgeMode::Pending => Ok(BridgeOutcome::pending(None)),
            BridgeMode::Fail(error) => Ok(BridgeOutcome::failed(error)),
            BridgeMode::Error(error) => Err(RailError::network(error)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_succeed_mode_records_and_confirms() {
        let mock = MockBridgeClient::new();
        let outcome = mock
            .transfer("0xdest", "base_sepolia", Amount::parse("1.00").unwrap(), None)
            .await
            .unwrap();
        assert!(outcome.success);
        assert!(outcome.tx_hash.is_some());
        assert_eq!(mock.transfer_count(), 1);
        assert_eq!(mock.transfers()[0].destination, "0xdest");
    }

    #[tokio::test]
    async fn test_fail_mode_returns_explicit_failure() {
        let mock = MockBridgeClient::new().with_failure("no liquidity");
        let outcome = mock
            .transfer("0xdest", "base_sepolia", Amount::ZERO, None)
            .await
            .unwrap();
        assert!(!outcome.success);
        assert_eq!(outcome.error.as_deref(), Some("no liquidity"));
    }

    #[tokio::test]
    async fn test_error_mode_still_records_the_attempt() {
        let mock = MockBridgeClient::new().with_error("connection reset");
        assert!(mock
            .transfer("0xdest", "base_sepolia", Amount::ZERO, None)
            .await
            .is_err());
        assert_eq!(mock.transfer_count(), 1);
    }

    #[tokio::test]
    async fn test_unknown_chain_is_rejected() {
        let mock = MockBridgeClient::new();
        let err = mock.transfer("0xdest", "dogechain", Amount::ZERO, None).await;
        assert!(matches!(err, Err(RailError::UnsupportedChain(_))));
        assert_eq!(mock.transfer_count(), 0);
    }
}
