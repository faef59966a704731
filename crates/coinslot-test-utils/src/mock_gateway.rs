//! Mock implementation of the `GatewayClient` trait.

use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use coinslot_rails::{
    chain_by_key, GatewayBalance, GatewayClient, GatewayFunding, GatewayMint, GatewayTransfer,
    RailError, RailResult,
};
use coinslot_types::Amount;

/// One recorded gateway `transfer` (burn) call.
#[derive(Debug, Clone, PartialEq)]
pub struct GatewayTransferCall {
    pub recipient: String,
    pub amount: Amount,
    pub chain_key: String,
}

struct MockGatewayInner {
    /// Available pre-funded balance.
    available: Amount,
    /// Recorded `ensure_balance` requirements.
    funding_requests: Vec<Amount>,
    /// Recorded burns.
    transfers: Vec<GatewayTransferCall>,
    /// Recorded mints: (attestation, signature, chain_key).
    mints: Vec<(String, String, String)>,
    /// When true, `ensure_balance` reports failure.
    fail_funding: bool,
    /// When true, `transfer` reports failure.
    fail_transfer: bool,
    /// When true, `mint` reports failure.
    fail_mint: bool,
    /// Auto-incrementing attestation/tx counter.
    counter: u64,
}

/// A mock implementation of the `GatewayClient` trait for testing.
///
/// Tracks funding, burns, and mints in memory. Failure switches produce
/// explicit (`success == false`) outcomes, matching how the real rail
/// reports rejections. Cheap to clone; all clones share the same state.
#[derive(Clone)]
pub struct MockGatewayClient {
    inner: Arc<RwLock<MockGatewayInner>>,
}

impl Default for MockGatewayClient {
    fn default() -> Self {
        Self::new()
    }
}

impl MockGatewayClient {
    /// Create a mock with a zero balance where every operation succeeds.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(MockGatewayInner {
                available: Amount::ZERO,
                funding_requests: Vec::new(),
                transfers: Vec::new(),
                mints: Vec::new(),
                fail_funding: false,
                fail_transfer: false,
                fail_mint: false,
                counter: 0,
            })),
        }
    }

    /// Set the available pre-funded balance.
    pub fn with_balance(self, available: Amount) -> Self {
        self.inner.write().unwrap().available = available;
        self
    }

    /// Configure `ensure_balance` to fail.
    pub fn with_funding_failure(self) -> Self {
        self.inner.write().unwrap().fail_funding = true;
        self
    }

    /// Configure `transfer` to fail.
    pub fn with_transfer_failure(self) -> Self {
        self.inner.write().unwrap().fail_transfer = true;
        self
    }

    /// Configure `mint` to fail.
    pub fn with_mint_failure(self) -> Self {
        self.inner.write().unwrap().fail_mint = true;
        self
    }

    /// Flip the `transfer` failure mode at runtime.
    pub fn set_fail_transfer(&self, fail: bool) {
        self.inner.write().unwrap().fail_transfer = fail;
    }

    // =========================================================================
    // Assertion Helpers
    // =========================================================================

    /// Recorded `ensure_balance` requirements, in order.
    pub fn funding_requests(&self) -> Vec<Amount> {
        self.inner.read().unwrap().funding_requests.clone()
    }

    /// Recorded burns, in order.
    pub fn transfers(&self) -> Vec<GatewayTransferCall> {
        self.inner.read().unwrap().transfers.clone()
    }

    /// Recorded mints, in order.
    pub fn mints(&self) -> Vec<(String, String, String)> {
        self.inner.read().unwrap().mints.clone()
    }
}

#[async_trait]
impl GatewayClient for MockGatewayClient {
    async fn ensure_balance(&self, required: Amount) -> RailResult<GatewayFunding> {
        let mut inner = self.inner.write().unwrap();
        inner.funding_requests.push(required);
        if inner.fail_funding {
            return Ok(GatewayFunding::failed("mock: deposit failed"));
        }
        if inner.available >= required {
            return Ok(GatewayFunding::sufficient());
        }
        // Deposit exactly the shortfall so the balance covers the request.
        inner.available = required;
        inner.counter += 1;
        Ok(GatewayFunding::deposited(format!(
            "0xdeposit{:04x}",
            inner.counter
        )))
    }

    async fn transfer(
        &self,
        recipient: &str,
        amount: Amount,
        chain_key: &str,
    ) -> RailResult<GatewayTransfer> {
        if chain_by_key(chain_key).is_none() {
            return Err(RailError::unsupported_chain(chain_key));
        }
        let mut inner = self.inner.write().unwrap();
        if inner.fail_transfer {
            return Ok(GatewayTransfer::failed("mock: burn rejected"));
        }
        inner.transfers.push(GatewayTransferCall {
            recipient: recipient.to_string(),
            amount,
            chain_key: chain_key.to_string(),
        });
        inner.available = inner.available.checked_sub(amount).unwrap_or(Amount::ZERO);
        inner.counter += 1;
        Ok(GatewayTransfer::accepted(
            format!("attn-{:04x}", inner.counter),
            format!("sig-{:04x}", inner.counter),
        ))
    }

    async fn mint(
        &self,
        attestation: &str,
        signature: &str,
        chain_key: &str,
    ) -> RailResult<GatewayMint> {
        let chain = chain_by_key(chain_key)
            .ok_or_else(|| RailError::unsupported_chain(chain_key))?;
        let mut inner = self.inner.write().unwrap();
        if inner.fail_mint {
            return Ok(GatewayMint::failed("mock: mint reverted"));
        }
        inner
            .mints
            .push((attestation.to_string(), signature.to_string(), chain_key.to_string()));
        inner.counter += 1;
        let tx_hash = format!("0xmint{:04x}", inner.counter);
        let url = chain.tx_url(&tx_hash);
        Ok(GatewayMint::minted(tx_hash, Some(url)))
    }

    async fn balance(&self) -> RailResult<GatewayBalance> {
        let inner = self.inner.read().unwrap();
        Ok(GatewayBalance {
            available: inner.available,
        })
    }
}
