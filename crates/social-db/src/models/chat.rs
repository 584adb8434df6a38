//! Chat database model

use sqlx::FromRow;
use uuid::Uuid;

/// Database model for chats table
#[derive(Debug, Clone, FromRow)]
pub struct ChatModel {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub owner_id: Uuid,
}
