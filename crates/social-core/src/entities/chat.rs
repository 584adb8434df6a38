//! Chat entity - a group conversation owned by one user

use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chat {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub owner_id: Uuid,
}

impl Chat {
    pub fn new(name: String, description: String, owner_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            description,
            owner_id,
        }
    }

    /// Check if the given user owns this chat
    #[inline]
    pub fn is_owner(&self, user_id: Uuid) -> bool {
        self.owner_id == user_id
    }
}
