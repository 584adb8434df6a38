//! Domain events - published on the event bus after a mutation commits
//!
//! On the wire every event is `{"name": ..., "data": {...}, "timestamp": <ns>}`.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

/// All possible domain events
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "name", content = "data", rename_all = "snake_case")]
pub enum DomainEvent {
    // =========================================================================
    // Message Events
    // =========================================================================
    NewMessage(MessageEvent),
    MessageUpdated(MessageEvent),
    MessageDeleted(MessageEvent),

    // =========================================================================
    // Chat Events
    // =========================================================================
    ChatDeleted(ChatDeletedEvent),
    ChatMemberCreated(ChatMemberEvent),
    ChatMemberDeleted(ChatMemberEvent),

    // =========================================================================
    // Friendship Events
    // =========================================================================
    FriendRequest(FriendRequestEvent),
    FriendRequestUpdate(FriendRequestUpdateEvent),
    FriendAdded(FriendEvent),
    FriendDeleted(FriendEvent),
}

impl DomainEvent {
    /// Get the event name
    pub fn name(&self) -> &'static str {
        match self {
            Self::NewMessage(_) => "new_message",
            Self::MessageUpdated(_) => "message_updated",
            Self::MessageDeleted(_) => "message_deleted",
            Self::ChatDeleted(_) => "chat_deleted",
            Self::ChatMemberCreated(_) => "chat_member_created",
            Self::ChatMemberDeleted(_) => "chat_member_deleted",
            Self::FriendRequest(_) => "friend_request",
            Self::FriendRequestUpdate(_) => "friend_request_update",
            Self::FriendAdded(_) => "friend_added",
            Self::FriendDeleted(_) => "friend_deleted",
        }
    }

    /// The chat this event belongs to, if any
    pub fn chat_id(&self) -> Option<Uuid> {
        match self {
            Self::NewMessage(e) | Self::MessageUpdated(e) | Self::MessageDeleted(e) => {
                Some(e.chat_id)
            }
            Self::ChatDeleted(e) => Some(e.chat_id),
            Self::ChatMemberCreated(e) | Self::ChatMemberDeleted(e) => Some(e.chat_id),
            _ => None,
        }
    }

    /// Users named directly in the payload
    pub fn user_ids(&self) -> Vec<Uuid> {
        match self {
            Self::ChatMemberCreated(e) | Self::ChatMemberDeleted(e) => vec![e.user_id],
            Self::FriendRequest(e) => vec![e.from_id, e.to_id],
            Self::FriendRequestUpdate(e) => vec![e.from, e.to],
            Self::FriendAdded(e) | Self::FriendDeleted(e) => vec![e.friend_id, e.user_id],
            _ => Vec::new(),
        }
    }
}

/// A domain event stamped with its emission time in nanoseconds since the epoch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    #[serde(flatten)]
    pub kind: DomainEvent,
    pub timestamp: i64,
}

impl Event {
    pub fn new(kind: DomainEvent, timestamp: i64) -> Self {
        Self { kind, timestamp }
    }

    /// Stamp the event with the current time
    pub fn now(kind: DomainEvent) -> Self {
        let timestamp = Utc::now().timestamp_nanos_opt().unwrap_or(i64::MAX);
        Self { kind, timestamp }
    }

    #[inline]
    pub fn name(&self) -> &'static str {
        self.kind.name()
    }
}

// ============================================================================
// Event Structs
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageEvent {
    pub message_id: Uuid,
    pub chat_id: Uuid,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatDeletedEvent {
    pub chat_id: Uuid,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMemberEvent {
    pub chat_id: Uuid,
    pub user_id: Uuid,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FriendRequestEvent {
    pub from_id: Uuid,
    pub to_id: Uuid,
    pub id: Uuid,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FriendRequestUpdateEvent {
    pub friend_request_id: Uuid,
    pub from: Uuid,
    pub to: Uuid,
    pub code: FriendRequestUpdateCode,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FriendEvent {
    pub friend_id: Uuid,
    pub user_id: Uuid,
}

/// How a friend request left the pending state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum FriendRequestUpdateCode {
    Accepted,
    Declined,
    Withdrawn,
}

impl From<FriendRequestUpdateCode> for u8 {
    fn from(code: FriendRequestUpdateCode) -> Self {
        match code {
            FriendRequestUpdateCode::Accepted => 1,
            FriendRequestUpdateCode::Declined => 2,
            FriendRequestUpdateCode::Withdrawn => 3,
        }
    }
}

impl TryFrom<u8> for FriendRequestUpdateCode {
    type Error = DomainError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(Self::Accepted),
            2 => Ok(Self::Declined),
            3 => Ok(Self::Withdrawn),
            other => Err(DomainError::validation(format!(
                "unknown friend request update code {other}"
            ))),
        }
    }
}
