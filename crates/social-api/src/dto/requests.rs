//! Request DTOs specific to the HTTP layer

use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

/// Body of `POST /chats/:chat_id/members`
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AddMemberRequest {
    pub user_id: Uuid,
}

/// Body of `POST /users/@me/friend-requests`
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct FriendRequestCreate {
    pub user_id: Uuid,
}
