//! # Broadcast Bus
//!
//! Backs the core's `NotificationBus` with a tokio broadcast channel so
//! WebSocket subscribers receive mutation events as they happen.
//!
//! Publishing is fire-and-forget per the core contract: a send into a
//! channel with no receivers is not an error, and a slow subscriber that
//! lags behind the channel capacity simply misses events — the mutation
//! path is never blocked or failed by delivery.

use plume_core::{Event, NotificationBus};
use tokio::sync::broadcast;

/// Default channel capacity; lagging subscribers drop oldest events.
const DEFAULT_CAPACITY: usize = 256;

/// Cloneable handle around a broadcast channel carrying bus events.
#[derive(Debug, Clone)]
pub struct BroadcastBus {
    sender: broadcast::Sender<Event>,
}

impl Default for BroadcastBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl BroadcastBus {
    /// Create a bus with the given channel capacity.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Attach a new subscriber; receives events published after this call.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.sender.subscribe()
    }

    /// Number of currently attached subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl NotificationBus for BroadcastBus {
    fn publish(&self, event: Event) {
        // Err means no receivers are attached; the mutation result does
        // not depend on anyone listening.
        let _ = self.sender.send(event);
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use plume_core::{Blog, BlogId, MutationKind, UserId};

    fn sample_blog() -> Blog {
        Blog {
            id: BlogId::new("b-1"),
            title: "T".to_string(),
            body: "B".to_string(),
            published: true,
            author: UserId::new("u-1"),
        }
    }

    #[tokio::test]
    async fn subscriber_receives_published_event() {
        let bus = BroadcastBus::new(8);
        let mut rx = bus.subscribe();

        bus.publish(Event::blog(MutationKind::Created, sample_blog()));

        let event = rx.recv().await.expect("recv");
        assert_eq!(event.mutation(), MutationKind::Created);
    }

    #[tokio::test]
    async fn publish_without_subscribers_does_not_fail() {
        let bus = BroadcastBus::new(8);
        assert_eq!(bus.subscriber_count(), 0);
        bus.publish(Event::blog(MutationKind::Deleted, sample_blog()));
    }

    #[tokio::test]
    async fn subscribers_only_see_events_after_attach() {
        let bus = BroadcastBus::new(8);
        bus.publish(Event::blog(MutationKind::Created, sample_blog()));

        let mut rx = bus.subscribe();
        bus.publish(Event::blog(MutationKind::Updated, sample_blog()));

        let event = rx.recv().await.expect("recv");
        assert_eq!(event.mutation(), MutationKind::Updated);
        assert!(rx.try_recv().is_err());
    }
}
