//! Subscriber side of the local bus.

use std::pin::Pin;
use std::sync::{Arc, Weak};
use std::task::{Context, Poll};

use futures::stream::{BoxStream, Stream};
use social_core::{BusError, BusResult, Event, Subscription};
use tokio::sync::mpsc;

use super::local::Registry;

/// Removes the subscriber's queue from the bus when released or dropped
pub(crate) struct Registration {
    id: u64,
    registry: Weak<Registry>,
}

impl Registration {
    pub(crate) fn new(id: u64, registry: Weak<Registry>) -> Self {
        Self { id, registry }
    }

    fn release(&self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.remove(self.id);
        }
    }
}

impl Drop for Registration {
    fn drop(&mut self) {
        self.release();
    }
}

/// Stream handed out by [`LocalSubscription::stream`]
struct Feed {
    receiver: mpsc::Receiver<Event>,
    _registration: Arc<Registration>,
}

impl Stream for Feed {
    type Item = Event;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Event>> {
        self.receiver.poll_recv(cx)
    }
}

/// A subscriber handle returned by `LocalEventBus::channel`
pub struct LocalSubscription {
    registration: Arc<Registration>,
    receiver: Option<mpsc::Receiver<Event>>,
    closed: bool,
}

impl LocalSubscription {
    pub(crate) fn new(registration: Registration, receiver: mpsc::Receiver<Event>) -> Self {
        Self {
            registration: Arc::new(registration),
            receiver: Some(receiver),
            closed: false,
        }
    }

    pub fn id(&self) -> u64 {
        self.registration.id
    }
}

impl Subscription for LocalSubscription {
    fn stream(&mut self) -> BusResult<BoxStream<'static, Event>> {
        if self.closed {
            return Err(BusError::Closed);
        }
        let receiver = self.receiver.take().ok_or(BusError::StreamTaken)?;

        Ok(Box::pin(Feed {
            receiver,
            _registration: Arc::clone(&self.registration),
        }))
    }

    fn close(&mut self) -> BusResult<()> {
        if self.closed {
            return Err(BusError::Closed);
        }
        self.closed = true;
        self.receiver = None;
        self.registration.release();
        Ok(())
    }

    fn is_closed(&self) -> bool {
        self.closed
    }
}

impl std::fmt::Debug for LocalSubscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalSubscription")
            .field("id", &self.registration.id)
            .field("closed", &self.closed)
            .finish()
    }
}
