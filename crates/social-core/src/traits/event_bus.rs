//! Event bus traits (ports) - best-effort fan-out of domain events

use futures::stream::BoxStream;
use thiserror::Error;

use crate::events::Event;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BusError {
    #[error("Subscription is closed")]
    Closed,

    #[error("Subscription is already being streamed")]
    StreamTaken,

    #[error("Event bus error: {0}")]
    Internal(String),
}

pub type BusResult<T> = Result<T, BusError>;

/// Publish/subscribe hub shared by the whole application
pub trait EventBus: Send + Sync {
    /// Register a new subscriber feed
    fn channel(&self) -> BusResult<Box<dyn Subscription>>;

    /// Deliver the event to every subscriber that has room for it
    fn send(&self, event: Event) -> BusResult<()>;
}

/// One subscriber's feed
pub trait Subscription: Send {
    /// Events delivered to this subscriber. The stream ends once the
    /// subscription is closed and the already queued events are drained.
    /// It can be taken once.
    fn stream(&mut self) -> BusResult<BoxStream<'static, Event>>;

    /// Unregister from the bus
    fn close(&mut self) -> BusResult<()>;

    fn is_closed(&self) -> bool;
}
