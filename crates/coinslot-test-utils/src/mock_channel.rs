//! Mock implementation of the `ChannelClient` trait.

use std::collections::HashSet;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use coinslot_rails::{ChannelClient, ChannelId, RailError, RailResult};
use coinslot_types::Amount;

struct MockChannelInner {
    /// Channels currently open.
    open_channels: HashSet<String>,
    /// Every channel ever opened, in order.
    opened: Vec<ChannelId>,
    /// Recorded resize calls: (channel id, amount, destination).
    resizes: Vec<(String, Amount, String)>,
    /// Recorded close calls, in order.
    closes: Vec<String>,
    /// When true, `open` fails.
    fail_open: bool,
    /// When true, `resize` fails.
    fail_resize: bool,
    /// When true, `close` fails.
    fail_close: bool,
    /// Auto-incrementing channel counter.
    counter: u64,
}

/// A mock implementation of the `ChannelClient` trait for testing.
///
/// Tracks opened/resized/closed channels in memory. Cheap to clone; all
/// clones share the same state.
#[derive(Clone)]
pub struct MockChannelClient {
    inner: Arc<RwLock<MockChannelInner>>,
}

impl Default for MockChannelClient {
    fn default() -> Self {
        Self::new()
    }
}

impl MockChannelClient {
    /// Create a mock where every operation succeeds.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(MockChannelInner {
                open_channels: HashSet::new(),
                opened: Vec::new(),
                resizes: Vec::new(),
                closes: Vec::new(),
                fail_open: false,
                fail_resize: false,
                fail_close: false,
                counter: 0,
            })),
        }
    }

    /// Configure `open` to fail.
    pub fn with_open_failure(self) -> Self {
        self.inner.write().unwrap().fail_open = true;
        self
    }

    /// Configure `resize` to fail.
    pub fn with_resize_failure(self) -> Self {
        self.inner.write().unwrap().fail_resize = true;
        self
    }

    /// Configure `close` to fail.
    pub fn with_close_failure(self) -> Self {
        self.inner.write().unwrap().fail_close = true;
        self
    }

    /// Flip the `open` failure mode at runtime.
    pub fn set_fail_open(&self, fail: bool) {
        self.inner.write().unwrap().fail_open = fail;
    }

    /// Flip the `close` failure mode at runtime.
    pub fn set_fail_close(&self, fail: bool) {
        self.inner.write().unwrap().fail_close = fail;
    }

    // =========================================================================
    // Assertion Helpers
    // =========================================================================

    /// Every channel opened, in order.
    pub fn opened(&self) -> Vec<ChannelId> {
        self.inner.read().unwrap().opened.clone()
    }

    /// Recorded resize calls.
    pub fn resizes(&self) -> Vec<(String, Amount, String)> {
        self.inner.read().unwrap().resizes.clone()
    }

    /// Recorded close calls.
    pub fn closes(&self) -> Vec<String> {
        self.inner.read().unwrap().closes.clone()
    }

    /// Number of channels still open.
    pub fn open_count(&self) -> usize {
        self.inner.read().unwrap().open_channels.len()
    }
}

#[async_trait]
impl ChannelClient for MockChannelClient {
    async fn open(&self, _token: &str, _chain_id: u64) -> RailResult<ChannelId> {
        let mut inner = self.inner.write().unwrap();
        if inner.fail_open {
            return Err(RailError::network("mock: channel open refused"));
        }
        inner.counter += 1;
        let id = ChannelId::new(format!("ch-{}", inner.counter));
        inner.open_channels.insert(id.as_str().to_string());
        inner.opened.push(id.clone());
        Ok(id)
    }

    async fn resize(
        &self,
        channel_id: &ChannelId,
        amount: Amount,
        destination: &str,
    ) -> RailResult<()> {
        let mut inner = self.inner.write().unwrap();
        if inner.fail_resize {
            return Err(RailError::network("mock: resize refused"));
        }
        if !inner.open_channels.contains(channel_id.as_str()) {
            return Err(RailError::rpc(format!("unknown channel {channel_id}")));
        }
        inner.resizes.push((
            channel_id.as_str().to_string(),
            amount,
            destination.to_string(),
        ));
        Ok(())
    }

    async fn exists(&self, channel_id: &ChannelId) -> RailResult<bool> {
        let inner = self.inner.read().unwrap();
        Ok(inner.open_channels.contains(channel_id.as_str()))
    }

    async fn close(&self, channel_id: &ChannelId, _destination: &str) -> RailResult<()> {
        let mut inner = self.inner.write().unwrap();
        if inner.fail_close {
            return Err(RailError::timeout("mock: close timed out"));
        }
        if !inner.open_channels.remove(channel_id.as_str()) {
            return Err(RailError::rpc(format!("unknown channel {channel_id}")));
        }
        inner.closes.push(channel_id.as_str().to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_open_resize_close_lifecycle() {
        let mock = MockChannelClient::new();
        let id = mock.open("usdc", 84_532).await.unwrap();
        assert!(mock.exists(&id).await.unwrap());

        mock.resize(&id, Amount::parse("2.00").unwrap(), "0xdest")
            .await
            .unwrap();
        assert_eq!(mock.resizes().len(), 1);

        mock.close(&id, "0xdest").await.unwrap();
        assert!(!mock.exists(&id).await.unwrap());
        assert_eq!(mock.open_count(), 0);
    }

    #[tokio::test]
    async fn test_open_failure_mode() {
        let mock = MockChannelClient::new().with_open_failure();
        assert!(mock.open("usdc", 84_532).await.is_err());
        assert!(mock.opened().is_empty());
    }

    #[tokio::test]
    async fn test_close_unknown_channel_is_error() {
        let mock = MockChannelClient::new();
        let err = mock.close(&ChannelId::new("ch-99"), "0xdest").await;
        assert!(err.is_err());
    }
}
