//! Chat member entity - a user's membership in a chat

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

/// Membership state stored alongside a (user, chat) pair.
///
/// Members added through a chat start out `Active`; there is no invitation
/// workflow, so an added user is a full member immediately. The creator of a
/// chat is stored as `Owner`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "i32", try_from = "i32")]
pub enum MemberStatus {
    #[default]
    Active,
    Owner,
}

impl MemberStatus {
    pub const fn code(self) -> i32 {
        match self {
            Self::Active => 0,
            Self::Owner => 1,
        }
    }
}

impl From<MemberStatus> for i32 {
    fn from(status: MemberStatus) -> Self {
        status.code()
    }
}

impl TryFrom<i32> for MemberStatus {
    type Error = DomainError;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Self::Active),
            1 => Ok(Self::Owner),
            other => Err(DomainError::validation(format!(
                "unknown member status {other}"
            ))),
        }
    }
}

/// Chat member entity (junction between User and Chat)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMember {
    pub user_id: Uuid,
    pub chat_id: Uuid,
    pub status: MemberStatus,
}

impl ChatMember {
    pub fn new(user_id: Uuid, chat_id: Uuid, status: MemberStatus) -> Self {
        Self {
            user_id,
            chat_id,
            status,
        }
    }
}
