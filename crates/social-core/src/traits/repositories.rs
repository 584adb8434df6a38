//! Repository traits (ports) - define the interface for data access
//!
//! `Store` is the full operation set over the six entity kinds. A
//! `Repository` is a `Store` that can also open a `Transaction`, which is in
//! turn a `Store` whose writes become visible only on `commit`.

use async_trait::async_trait;
use uuid::Uuid;

use crate::entities::{Chat, ChatMember, FriendRequest, Message, User};
use crate::error::DomainError;

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

/// Offset/count window for list queries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub offset: i64,
    pub count: i64,
}

impl Page {
    pub const MAX_COUNT: i64 = 100;

    /// Build a page, clamping negative values to zero and the count to `MAX_COUNT`
    pub fn new(offset: i64, count: i64) -> Self {
        Self {
            offset: offset.max(0),
            count: count.clamp(0, Self::MAX_COUNT),
        }
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new(0, 50)
    }
}

#[async_trait]
pub trait Store: Send + Sync {
    // ========================================================================
    // Users
    // ========================================================================

    /// Insert a user; a taken username is a `Conflict`
    async fn create_user(&self, user: &User) -> RepoResult<()>;

    async fn get_user(&self, id: Uuid) -> RepoResult<Option<User>>;

    async fn get_user_by_username(&self, username: &str) -> RepoResult<Option<User>>;

    async fn update_user(&self, user: &User) -> RepoResult<()>;

    /// Delete a user along with everything that references it
    async fn delete_user(&self, id: Uuid) -> RepoResult<()>;

    // ========================================================================
    // Friend connections
    // ========================================================================

    async fn create_friend_connection(&self, user_id: Uuid, friend_id: Uuid) -> RepoResult<()>;

    async fn delete_friend_connection(&self, user_id: Uuid, friend_id: Uuid) -> RepoResult<()>;

    /// Order-insensitive existence check
    async fn friend_connection_exists(&self, user_id: Uuid, friend_id: Uuid) -> RepoResult<bool>;

    /// Users connected to `user_id`, ordered by id
    async fn get_user_friends(&self, user_id: Uuid, page: Page) -> RepoResult<Vec<User>>;

    async fn count_user_friends(&self, user_id: Uuid) -> RepoResult<i64>;

    // ========================================================================
    // Friend requests
    // ========================================================================

    async fn create_friend_request(&self, request: &FriendRequest) -> RepoResult<()>;

    async fn get_friend_request(&self, id: Uuid) -> RepoResult<Option<FriendRequest>>;

    /// Find the pending request sent by `from_id` to `to_id` (direction matters)
    async fn find_friend_request(
        &self,
        from_id: Uuid,
        to_id: Uuid,
    ) -> RepoResult<Option<FriendRequest>>;

    async fn delete_friend_request(&self, id: Uuid) -> RepoResult<()>;

    async fn get_incoming_friend_requests(
        &self,
        user_id: Uuid,
        page: Page,
    ) -> RepoResult<Vec<FriendRequest>>;

    async fn get_outgoing_friend_requests(
        &self,
        user_id: Uuid,
        page: Page,
    ) -> RepoResult<Vec<FriendRequest>>;

    async fn count_incoming_friend_requests(&self, user_id: Uuid) -> RepoResult<i64>;

    async fn count_outgoing_friend_requests(&self, user_id: Uuid) -> RepoResult<i64>;

    // ========================================================================
    // Chats
    // ========================================================================

    async fn create_chat(&self, chat: &Chat) -> RepoResult<()>;

    async fn get_chat(&self, id: Uuid) -> RepoResult<Option<Chat>>;

    /// Delete a chat along with its memberships and messages
    async fn delete_chat(&self, id: Uuid) -> RepoResult<()>;

    // ========================================================================
    // Chat members
    // ========================================================================

    /// Insert a membership; an existing (user, chat) pair is a `Conflict`
    async fn create_chat_member(&self, member: &ChatMember) -> RepoResult<()>;

    async fn get_chat_member(&self, user_id: Uuid, chat_id: Uuid) -> RepoResult<Option<ChatMember>>;

    /// Delete a membership along with the member's messages in that chat
    async fn delete_chat_member(&self, user_id: Uuid, chat_id: Uuid) -> RepoResult<()>;

    async fn get_chat_members(&self, chat_id: Uuid, page: Page) -> RepoResult<Vec<ChatMember>>;

    async fn count_chat_members(&self, chat_id: Uuid) -> RepoResult<i64>;

    async fn get_user_chats(&self, user_id: Uuid, page: Page) -> RepoResult<Vec<ChatMember>>;

    async fn count_user_chats(&self, user_id: Uuid) -> RepoResult<i64>;

    // ========================================================================
    // Messages
    // ========================================================================

    /// Insert a message; the sender must be a member of the chat
    async fn create_message(&self, message: &Message) -> RepoResult<()>;

    async fn get_message(&self, id: Uuid) -> RepoResult<Option<Message>>;

    async fn update_message(&self, message: &Message) -> RepoResult<()>;

    async fn delete_message(&self, id: Uuid) -> RepoResult<()>;

    /// Messages of a chat, newest first
    async fn get_chat_messages(&self, chat_id: Uuid, page: Page) -> RepoResult<Vec<Message>>;

    async fn count_chat_messages(&self, chat_id: Uuid) -> RepoResult<i64>;
}

/// A store that can open transactions
#[async_trait]
pub trait Repository: Store {
    async fn begin(&self) -> RepoResult<Box<dyn Transaction>>;
}

/// A scoped unit of work. Dropping it without `commit` discards its writes.
#[async_trait]
pub trait Transaction: Store {
    async fn commit(self: Box<Self>) -> RepoResult<()>;

    async fn rollback(self: Box<Self>) -> RepoResult<()>;
}
