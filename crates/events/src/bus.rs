//! In-process event bus backed by a `tokio::sync::broadcast` channel.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use vellum_core::types::{ItemNumber, Timestamp};

// ---------------------------------------------------------------------------
// PublicationEvent
// ---------------------------------------------------------------------------

/// Emitted when reconciliation activates a new live revision.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicationEvent {
    /// Tenant the activation happened in.
    pub tenant_domain: String,

    /// Logical content item.
    pub item_number: ItemNumber,

    /// Title of the now-live revision.
    pub title: String,

    /// Public path of the now-live revision.
    pub url_path: String,

    /// The revision's scheduled publication instant.
    pub published_at: Timestamp,

    /// When the event was created (UTC).
    pub timestamp: DateTime<Utc>,
}

impl PublicationEvent {
    pub fn new(
        tenant_domain: impl Into<String>,
        item_number: ItemNumber,
        title: impl Into<String>,
        url_path: impl Into<String>,
        published_at: Timestamp,
    ) -> Self {
        Self {
            tenant_domain: tenant_domain.into(),
            item_number,
            title: title.into(),
            url_path: url_path.into(),
            published_at,
            timestamp: Utc::now(),
        }
    }
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 256;

/// In-process fan-out event bus, shared via `Arc<EventBus>`.
pub struct EventBus {
    sender: broadcast::Sender<PublicationEvent>,
}

impl EventBus {
    /// Create a bus with a specific channel capacity.
    ///
    /// When the buffer is full, the oldest un-consumed messages are dropped
    /// and slow receivers will observe a `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all current subscribers.
    ///
    /// If there are no active subscribers the event is silently dropped;
    /// notification is best-effort by design.
    pub fn publish(&self, event: PublicationEvent) {
        // Ignore the SendError — it only means there are zero receivers.
        let _ = self.sender.send(event);
    }

    /// Subscribe to all future events.
    pub fn subscribe(&self) -> broadcast::Receiver<PublicationEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(item: ItemNumber) -> PublicationEvent {
        PublicationEvent::new("a.example.com", item, "Title", "/path", Utc::now())
    }

    #[tokio::test]
    async fn subscriber_receives_published_event() {
        let bus = EventBus::default();
        let mut rx = bus.subscribe();

        bus.publish(event(42));

        let received = rx.recv().await.unwrap();
        assert_eq!(received.item_number, 42);
        assert_eq!(received.tenant_domain, "a.example.com");
    }

    #[tokio::test]
    async fn publish_without_subscribers_does_not_panic() {
        let bus = EventBus::default();
        bus.publish(event(1));
    }

    #[tokio::test]
    async fn each_subscriber_sees_every_event() {
        let bus = EventBus::default();
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        bus.publish(event(7));

        assert_eq!(rx1.recv().await.unwrap().item_number, 7);
        assert_eq!(rx2.recv().await.unwrap().item_number, 7);
    }
}
