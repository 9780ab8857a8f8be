use super::events::RoomEvent;
use tokio::sync::broadcast;
use tracing::debug;

/// Default per-subscriber queue depth.
pub const DEFAULT_FANOUT_CAPACITY: usize = 256;

/// Delivers one event to every live subscription.
///
/// Built on `tokio::sync::broadcast`: each subscriber owns a bounded
/// queue with per-subscription FIFO ordering. A subscriber that falls
/// behind loses the oldest events, and a subscriber whose transport is
/// gone is simply skipped; neither ever aborts delivery to the others
/// or raises to the broadcaster. Dropping the receiver unsubscribes it.
pub struct EventFanout {
    tx: broadcast::Sender<RoomEvent>,
}

impl EventFanout {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Register a new live channel. Only events broadcast after this
    /// call are delivered to it.
    pub fn subscribe(&self) -> broadcast::Receiver<RoomEvent> {
        self.tx.subscribe()
    }

    /// Push `event` to every currently-registered subscription.
    pub fn broadcast(&self, event: RoomEvent) {
        debug!(?event, subscribers = self.tx.receiver_count(), "fanout broadcast");
        // Zero live subscribers is not an error.
        let _ = self.tx.send(event);
    }

    /// Number of currently-live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for EventFanout {
    fn default() -> Self {
        Self::new(DEFAULT_FANOUT_CAPACITY)
    }
}
