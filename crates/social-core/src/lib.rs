//! # social-core
//!
//! Domain layer containing entities, validated forms, repository and event bus
//! traits, and domain events. This crate performs no I/O.

pub mod entities;
pub mod error;
pub mod events;
pub mod forms;
pub mod traits;

// Re-export commonly used types at crate root
pub use entities::{Chat, ChatMember, FriendConnection, FriendRequest, MemberStatus, Message, User};
pub use error::DomainError;
pub use events::{DomainEvent, Event, FriendRequestUpdateCode};
pub use traits::{
    BusError, BusResult, EventBus, Page, RepoResult, Repository, Store, Subscription, Transaction,
};
