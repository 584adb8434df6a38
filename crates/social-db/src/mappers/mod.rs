//! Entity <-> Model mappers
//!
//! Row models convert into domain entities. Member rows carry a raw status
//! code, so that conversion is fallible.

use social_core::entities::{Chat, ChatMember, FriendRequest, MemberStatus, Message, User};
use social_core::error::DomainError;

use crate::models::{ChatMemberModel, ChatModel, FriendRequestModel, MessageModel, UserModel};

impl From<UserModel> for User {
    fn from(model: UserModel) -> Self {
        User {
            id: model.id,
            username: model.username,
            password_hash: model.password_hash,
        }
    }
}

impl From<ChatModel> for Chat {
    fn from(model: ChatModel) -> Self {
        Chat {
            id: model.id,
            name: model.name,
            description: model.description,
            owner_id: model.owner_id,
        }
    }
}

impl TryFrom<ChatMemberModel> for ChatMember {
    type Error = DomainError;

    fn try_from(model: ChatMemberModel) -> Result<Self, Self::Error> {
        let status = MemberStatus::try_from(model.status)
            .map_err(|e| DomainError::Database(e.to_string()))?;
        Ok(ChatMember {
            user_id: model.user_id,
            chat_id: model.chat_id,
            status,
        })
    }
}

impl From<MessageModel> for Message {
    fn from(model: MessageModel) -> Self {
        Message {
            id: model.id,
            chat_id: model.chat_id,
            user_id: model.user_id,
            payload: model.payload,
            created_at: model.created_at,
            last_update: model.last_update,
        }
    }
}

impl From<FriendRequestModel> for FriendRequest {
    fn from(model: FriendRequestModel) -> Self {
        FriendRequest {
            id: model.id,
            from_id: model.from_id,
            to_id: model.to_id,
            created_at: model.created_at,
        }
    }
}

/// Convert a batch of member rows
pub fn members_from_models(models: Vec<ChatMemberModel>) -> Result<Vec<ChatMember>, DomainError> {
    models.into_iter().map(ChatMember::try_from).collect()
}
