//! Local (single process) event bus

mod local;
mod subscription;

pub use local::{LocalEventBus, DEFAULT_QUEUE_CAPACITY};
pub use subscription::LocalSubscription;
