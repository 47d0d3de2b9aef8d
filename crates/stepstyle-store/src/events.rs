//! # Notification Bus
//!
//! Process-wide change notifications so independent views (badge counters,
//! open cart pages) can refresh after a store mutation.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  CartStore::add() ──► write blob ──► bus.publish(CartChanged)           │
//! │                                            │                            │
//! │                      ┌─────────────────────┼─────────────────────┐      │
//! │                      ▼                     ▼                     ▼      │
//! │                cart badge            cart page view        (nobody)     │
//! │                re-reads store        re-reads store        still OK     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Delivery is best effort: events carry no payload, nothing is replayed,
//! and a subscriber that falls more than [`BUS_CAPACITY`] events behind sees
//! `Lagged` and should simply re-read the store.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::debug;

/// Buffered events per subscriber before old ones are dropped.
pub const BUS_CAPACITY: usize = 256;

/// Something persisted changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreEvent {
    CartChanged,
    WishlistChanged,
    AuthChanged,
}

/// Cheap-to-clone handle to one broadcast channel.
#[derive(Debug, Clone)]
pub struct EventBus {
    tx: broadcast::Sender<StoreEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(BUS_CAPACITY);
        EventBus { tx }
    }

    /// Publishes to every current subscriber. Having none is not an error.
    pub fn publish(&self, event: StoreEvent) {
        let delivered = self.tx.send(event).unwrap_or(0);
        debug!(?event, subscribers = delivered, "published store event");
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.tx.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::broadcast::error::{RecvError, TryRecvError};

    #[tokio::test]
    async fn test_publish_without_subscribers() {
        let bus = EventBus::new();
        bus.publish(StoreEvent::CartChanged);
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn test_every_subscriber_receives() {
        let bus = EventBus::new();
        let mut a = bus.subscribe();
        let mut b = bus.clone().subscribe();

        bus.publish(StoreEvent::WishlistChanged);

        assert_eq!(a.recv().await.unwrap(), StoreEvent::WishlistChanged);
        assert_eq!(b.recv().await.unwrap(), StoreEvent::WishlistChanged);
        assert!(matches!(a.try_recv(), Err(TryRecvError::Empty)));
    }

    #[tokio::test]
    async fn test_lagging_subscriber_loses_old_events() {
        let bus = EventBus::new();
        let mut rx = bus.subscribe();
        for _ in 0..BUS_CAPACITY + 5 {
            bus.publish(StoreEvent::CartChanged);
        }
        assert!(matches!(rx.recv().await, Err(RecvError::Lagged(5))));
        assert_eq!(rx.recv().await.unwrap(), StoreEvent::CartChanged);
    }
}
