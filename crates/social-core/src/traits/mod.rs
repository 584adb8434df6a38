//! Ports implemented by the infrastructure crates

mod event_bus;
mod repositories;

pub use event_bus::{BusError, BusResult, EventBus, Subscription};
pub use repositories::{Page, RepoResult, Repository, Store, Transaction};
