//! Friend connection entity - an accepted, unordered friendship

use uuid::Uuid;

/// Friendship between two users.
///
/// The pair is unordered: `(a, b)` and `(b, a)` denote the same connection.
/// Repositories store it under [`FriendConnection::key`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FriendConnection {
    pub user_id: Uuid,
    pub friend_id: Uuid,
}

impl FriendConnection {
    pub fn new(user_id: Uuid, friend_id: Uuid) -> Self {
        Self { user_id, friend_id }
    }

    /// Order-insensitive storage key: the smaller id first
    pub fn key(&self) -> (Uuid, Uuid) {
        if self.user_id <= self.friend_id {
            (self.user_id, self.friend_id)
        } else {
            (self.friend_id, self.user_id)
        }
    }

    #[inline]
    pub fn involves(&self, user_id: Uuid) -> bool {
        self.user_id == user_id || self.friend_id == user_id
    }

    /// The other side of the connection, seen from `user_id`
    pub fn other(&self, user_id: Uuid) -> Option<Uuid> {
        if self.user_id == user_id {
            Some(self.friend_id)
        } else if self.friend_id == user_id {
            Some(self.user_id)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_is_order_insensitive() {
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        assert_eq!(
            FriendConnection::new(a, b).key(),
            FriendConnection::new(b, a).key()
        );
    }

    #[test]
    fn test_other() {
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        let connection = FriendConnection::new(a, b);
        assert_eq!(connection.other(a), Some(b));
        assert_eq!(connection.other(b), Some(a));
        assert_eq!(connection.other(Uuid::new_v4()), None);
    }
}
