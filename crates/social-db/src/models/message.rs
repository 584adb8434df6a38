//! Message database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for messages table
#[derive(Debug, Clone, FromRow)]
pub struct MessageModel {
    pub id: Uuid,
    pub chat_id: Uuid,
    pub user_id: Uuid,
    pub payload: String,
    pub created_at: DateTime<Utc>,
    pub last_update: DateTime<Utc>,
}
