//! # social-events
//!
//! In-process event bus. Every subscriber gets its own bounded queue; a
//! publisher never waits, and a subscriber that falls behind loses the events
//! that do not fit.
//!
//! ## Example
//!
//! ```ignore
//! use social_events::LocalEventBus;
//! use social_core::EventBus;
//!
//! let bus = LocalEventBus::new(256);
//! let mut subscription = bus.channel()?;
//! let mut events = subscription.stream()?;
//!
//! bus.send(event)?;
//! let received = events.next().await;
//! ```

pub mod bus;

pub use bus::{LocalEventBus, LocalSubscription, DEFAULT_QUEUE_CAPACITY};
