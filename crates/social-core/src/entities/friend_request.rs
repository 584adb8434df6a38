//! Friend request entity - a pending friendship offer

use chrono::{DateTime, Utc};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FriendRequest {
    pub id: Uuid,
    pub from_id: Uuid,
    pub to_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl FriendRequest {
    pub fn new(from_id: Uuid, to_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            from_id,
            to_id,
            created_at: Utc::now(),
        }
    }

    /// Check if the user is either endpoint of the request
    #[inline]
    pub fn involves(&self, user_id: Uuid) -> bool {
        self.from_id == user_id || self.to_id == user_id
    }
}
