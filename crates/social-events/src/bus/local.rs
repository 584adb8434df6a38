//! Fan-out bus over bounded tokio channels.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use social_core::{BusResult, Event, EventBus, Subscription};
use tokio::sync::mpsc::{self, error::TrySendError};

use super::subscription::{LocalSubscription, Registration};

/// Queue length used when none is configured
pub const DEFAULT_QUEUE_CAPACITY: usize = 256;

/// Subscriber set shared between the bus and its subscriptions
pub(crate) struct Registry {
    next_id: AtomicU64,
    subscribers: RwLock<HashMap<u64, mpsc::Sender<Event>>>,
}

impl Registry {
    pub(crate) fn remove(&self, id: u64) {
        if self.subscribers.write().remove(&id).is_some() {
            tracing::debug!(subscriber_id = id, "Subscriber removed");
        }
    }
}

/// In-process event bus
#[derive(Clone)]
pub struct LocalEventBus {
    registry: Arc<Registry>,
    capacity: usize,
}

impl LocalEventBus {
    /// Create a bus whose subscribers each buffer up to `capacity` events
    pub fn new(capacity: usize) -> Self {
        Self {
            registry: Arc::new(Registry {
                next_id: AtomicU64::new(1),
                subscribers: RwLock::new(HashMap::new()),
            }),
            capacity: capacity.max(1),
        }
    }

    /// Number of registered subscribers
    pub fn subscriber_count(&self) -> usize {
        self.registry.subscribers.read().len()
    }
}

impl Default for LocalEventBus {
    fn default() -> Self {
        Self::new(DEFAULT_QUEUE_CAPACITY)
    }
}

impl std::fmt::Debug for LocalEventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalEventBus")
            .field("capacity", &self.capacity)
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

impl EventBus for LocalEventBus {
    fn channel(&self) -> BusResult<Box<dyn Subscription>> {
        let (sender, receiver) = mpsc::channel(self.capacity);
        let id = self.registry.next_id.fetch_add(1, Ordering::Relaxed);

        self.registry.subscribers.write().insert(id, sender);
        tracing::debug!(subscriber_id = id, "Subscriber registered");

        let registration = Registration::new(id, Arc::downgrade(&self.registry));
        Ok(Box::new(LocalSubscription::new(registration, receiver)))
    }

    fn send(&self, event: Event) -> BusResult<()> {
        let subscribers = self.registry.subscribers.read();

        for (id, sender) in subscribers.iter() {
            match sender.try_send(event.clone()) {
                Ok(()) => {}
                Err(TrySendError::Full(_)) => {
                    tracing::debug!(
                        subscriber_id = id,
                        event = event.name(),
                        "Subscriber queue full, event dropped"
                    );
                }
                Err(TrySendError::Closed(_)) => {
                    tracing::trace!(subscriber_id = id, "Subscriber gone, skipping");
                }
            }
        }

        tracing::trace!(
            event = event.name(),
            subscribers = subscribers.len(),
            "Event published"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;
    use social_core::events::{ChatDeletedEvent, DomainEvent};
    use social_core::BusError;
    use std::time::Duration;
    use uuid::Uuid;

    fn chat_deleted() -> Event {
        Event::now(DomainEvent::ChatDeleted(ChatDeletedEvent {
            chat_id: Uuid::new_v4(),
        }))
    }

    #[tokio::test]
    async fn test_fan_out_to_every_subscriber() {
        let bus = LocalEventBus::new(8);
        let mut first = bus.channel().unwrap();
        let mut second = bus.channel().unwrap();
        let mut first_events = first.stream().unwrap();
        let mut second_events = second.stream().unwrap();

        let event = chat_deleted();
        bus.send(event.clone()).unwrap();

        assert_eq!(first_events.next().await, Some(event.clone()));
        assert_eq!(second_events.next().await, Some(event));
    }

    #[tokio::test]
    async fn test_full_queue_drops_for_that_subscriber_only() {
        let bus = LocalEventBus::new(1);
        let mut slow = bus.channel().unwrap();
        let mut fast = bus.channel().unwrap();
        let mut slow_events = slow.stream().unwrap();
        let mut fast_events = fast.stream().unwrap();

        let first = chat_deleted();
        let second = chat_deleted();

        bus.send(first.clone()).unwrap();
        assert_eq!(fast_events.next().await, Some(first.clone()));

        // `slow` still holds `first`, so `second` does not fit.
        bus.send(second.clone()).unwrap();
        assert_eq!(fast_events.next().await, Some(second));

        assert_eq!(slow_events.next().await, Some(first));
        let nothing = tokio::time::timeout(Duration::from_millis(20), slow_events.next()).await;
        assert!(nothing.is_err());
    }

    #[tokio::test]
    async fn test_close_ends_stream_and_unregisters() {
        let bus = LocalEventBus::default();
        let mut subscription = bus.channel().unwrap();
        let mut events = subscription.stream().unwrap();
        assert_eq!(bus.subscriber_count(), 1);

        let event = chat_deleted();
        bus.send(event.clone()).unwrap();
        subscription.close().unwrap();

        assert_eq!(bus.subscriber_count(), 0);
        // Already queued events are still delivered, then the stream ends.
        assert_eq!(events.next().await, Some(event));
        assert_eq!(events.next().await, None);
    }

    #[tokio::test]
    async fn test_closed_subscription_rejects_calls() {
        let bus = LocalEventBus::default();
        let mut subscription = bus.channel().unwrap();

        subscription.close().unwrap();
        assert!(subscription.is_closed());
        assert_eq!(subscription.close().unwrap_err(), BusError::Closed);
        assert_eq!(subscription.stream().err(), Some(BusError::Closed));
    }

    #[tokio::test]
    async fn test_stream_can_be_taken_once() {
        let bus = LocalEventBus::default();
        let mut subscription = bus.channel().unwrap();

        let _events = subscription.stream().unwrap();
        assert_eq!(subscription.stream().err(), Some(BusError::StreamTaken));
    }

    #[tokio::test]
    async fn test_dropping_handle_and_stream_unregisters() {
        let bus = LocalEventBus::default();
        let mut subscription = bus.channel().unwrap();
        let events = subscription.stream().unwrap();

        drop(subscription);
        // The stream keeps the feed alive on its own.
        assert_eq!(bus.subscriber_count(), 1);

        drop(events);
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn test_send_without_subscribers() {
        let bus = LocalEventBus::default();
        assert!(bus.send(chat_deleted()).is_ok());
    }

    #[tokio::test]
    async fn test_concurrent_publishers() {
        let bus = LocalEventBus::new(1024);
        let mut subscription = bus.channel().unwrap();
        let events = subscription.stream().unwrap();

        let mut handles = Vec::new();
        for _ in 0..8 {
            let bus = bus.clone();
            handles.push(tokio::spawn(async move {
                for _ in 0..50 {
                    bus.send(chat_deleted()).unwrap();
                }
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }
        subscription.close().unwrap();

        assert_eq!(events.count().await, 400);
    }
}
