//! Domain events

mod domain_event;

pub use domain_event::{
    ChatDeletedEvent, ChatMemberEvent, DomainEvent, Event, FriendEvent, FriendRequestEvent,
    FriendRequestUpdateCode, FriendRequestUpdateEvent, MessageEvent,
};
