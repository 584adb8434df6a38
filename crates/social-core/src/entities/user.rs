//! User entity - represents an account

use uuid::Uuid;

/// User account as stored by the repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub password_hash: String,
}

impl User {
    /// Create a new User with a freshly generated id
    pub fn new(username: String, password_hash: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            username,
            password_hash,
        }
    }

    /// Update the username
    pub fn set_username(&mut self, username: String) {
        self.username = username;
    }
}
