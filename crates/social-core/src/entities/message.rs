//! Message entity - a message posted to a chat

use chrono::{DateTime, Utc};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: Uuid,
    pub chat_id: Uuid,
    pub user_id: Uuid,
    pub payload: String,
    pub created_at: DateTime<Utc>,
    pub last_update: DateTime<Utc>,
}

impl Message {
    /// Create a new message stamped with the current server time
    pub fn new(chat_id: Uuid, user_id: Uuid, payload: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            chat_id,
            user_id,
            payload,
            created_at: now,
            last_update: now,
        }
    }

    /// Replace the payload and refresh the last-update timestamp
    pub fn edit(&mut self, payload: String) {
        self.payload = payload;
        self.last_update = Utc::now();
    }

    /// Check if the message was edited after it was sent
    #[inline]
    pub fn is_edited(&self) -> bool {
        self.last_update > self.created_at
    }
}
