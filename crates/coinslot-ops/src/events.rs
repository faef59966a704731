//! Hardware event fan-out.
//!
//! Coin-acceptor pulses and NFC taps arrive from device threads and are
//! fanned out to UI clients over a broadcast channel. A bounded
//! recent-event buffer supports redelivery to late subscribers, which
//! means a consumer can see the same event twice; event ids exist so the
//! consumer can deduplicate, and the core ledger never assumes ids are
//! unique. [`SeenEvents`] is the consumer-side dedup helper.

use std::collections::{HashSet, VecDeque};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use coinslot_types::{Amount, Timestamp};

/// Default capacity of the recent-event buffer.
pub const RECENT_EVENT_CAPACITY: usize = 100;

/// An event that carries a (consumer-deduplicatable) id.
pub trait HardwareEvent: Clone + Send + 'static {
    /// The event's delivery id.
    fn event_id(&self) -> &str;
}

/// A coin inserted into the acceptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoinEvent {
    pub id: String,
    /// Raw pulse count from the acceptor.
    pub pulses: u32,
    /// Stablecoin value of the recognized denomination.
    pub value: Amount,
    pub timestamp: Timestamp,
}

impl HardwareEvent for CoinEvent {
    fn event_id(&self) -> &str {
        &self.id
    }
}

/// An NFC tag tap on the reader.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NfcTapEvent {
    pub id: String,
    pub uid: String,
    /// Wallet id read from the tag, or the UID itself as a fallback.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wallet_id: Option<String>,
    pub timestamp: Timestamp,
}

impl HardwareEvent for NfcTapEvent {
    fn event_id(&self) -> &str {
        &self.id
    }
}

/// Broadcast fan-out with a bounded recent-event buffer.
pub struct EventBus<E: HardwareEvent> {
    tx: broadcast::Sender<E>,
    recent: Mutex<VecDeque<E>>,
    capacity: usize,
}

impl<E: HardwareEvent> EventBus<E> {
    /// Create a bus keeping up to `capacity` recent events.
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self {
            tx,
            recent: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity,
        }
    }

    /// Publish an event to all subscribers and the recent buffer.
    ///
    /// Publishing with no live subscribers is not an error; the event
    /// still lands in the recent buffer.
    pub fn publish(&self, event: E) {
        if let Ok(mut recent) = self.recent.lock() {
            if recent.len() == self.capacity {
                recent.pop_front();
            }
            recent.push_back(event.clone());
        }
        let _ = self.tx.send(event);
    }

    /// Subscribe to future events.
    pub fn subscribe(&self) -> broadcast::Receiver<E> {
        self.tx.subscribe()
    }

    /// Snapshot of the recent-event buffer, oldest first.
    pub fn recent(&self) -> Vec<E> {
        self.recent
            .lock()
            .map(|r| r.iter().cloned().collect())
            .unwrap_or_default()
    }
}

impl<E: HardwareEvent> Default for EventBus<E> {
    fn default() -> Self {
        Self::new(RECENT_EVENT_CAPACITY)
    }
}

/// Consumer-side duplicate filter over event ids, bounded in memory.
pub struct SeenEvents {
    inner: Mutex<SeenInner>,
    capacity: usize,
}

struct SeenInner {
    order: VecDeque<String>,
    ids: HashSet<String>,
}

impl SeenEvents {
    /// Track up to `capacity` recent ids.
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Mutex::new(SeenInner {
                order: VecDeque::with_capacity(capacity),
                ids: HashSet::new(),
            }),
            capacity,
        }
    }

    /// Returns true the first time an id is seen, false on redelivery.
    pub fn first_seen(&self, id: &str) -> bool {
        let mut inner = match self.inner.lock() {
            Ok(guard) => guard,
            Err(_) => return true,
        };
        if inner.ids.contains(id) {
            return false;
        }
        if inner.order.len() == self.capacity {
            if let Some(evicted) = inner.order.pop_front() {
                inner.ids.remove(&evicted);
            }
        }
        inner.order.push_back(id.to_string());
        inner.ids.insert(id.to_string());
        true
    }
}

impl Default for SeenEvents {
    fn default() -> Self {
        Self::new(RECENT_EVENT_CAPACITY)
    }
}
