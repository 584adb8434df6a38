//! Chat member database model

use sqlx::FromRow;
use uuid::Uuid;

/// Database model for chat_members table
#[derive(Debug, Clone, FromRow)]
pub struct ChatMemberModel {
    pub user_id: Uuid,
    pub chat_id: Uuid,
    pub status: i32,
}
