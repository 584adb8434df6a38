//! Friend request database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for friend_requests table
#[derive(Debug, Clone, FromRow)]
pub struct FriendRequestModel {
    pub id: Uuid,
    pub from_id: Uuid,
    pub to_id: Uuid,
    pub created_at: DateTime<Utc>,
}
