//! In-memory repository
//!
//! Keeps every table in process memory behind one async lock. A transaction
//! holds that lock for its whole lifetime and works on a private copy of the
//! tables, which replaces the shared copy on commit. Transactions are
//! therefore fully serialized. Used for tests and single-node deployments.

mod tables;

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use tracing::debug;
use uuid::Uuid;

use social_core::entities::{Chat, ChatMember, FriendRequest, Message, User};
use social_core::traits::{Page, RepoResult, Repository, Store, Transaction};

use tables::Tables;

/// Repository backed by process memory
#[derive(Clone, Default)]
pub struct MemoryRepository {
    tables: Arc<AsyncMutex<Tables>>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

/// An open in-memory transaction
pub struct MemoryTransaction {
    shared: OwnedMutexGuard<Tables>,
    working: Mutex<Tables>,
}

#[async_trait]
impl Repository for MemoryRepository {
    async fn begin(&self) -> RepoResult<Box<dyn Transaction>> {
        let shared = Arc::clone(&self.tables).lock_owned().await;
        let working = Mutex::new(shared.clone());
        Ok(Box::new(MemoryTransaction { shared, working }))
    }
}

#[async_trait]
impl Transaction for MemoryTransaction {
    async fn commit(self: Box<Self>) -> RepoResult<()> {
        let Self { mut shared, working } = *self;
        *shared = working.into_inner();
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> RepoResult<()> {
        debug!("Discarding in-memory transaction");
        Ok(())
    }
}

/// Implements `Store` by forwarding to `Tables` behind `$lock`
macro_rules! impl_store {
    ($ty:ty, |$this:ident| $lock:expr) => {
        #[async_trait]
        impl Store for $ty {
            async fn create_user(&self, user: &User) -> RepoResult<()> {
                let $this = self;
                $lock.create_user(user)
            }

            async fn get_user(&self, id: Uuid) -> RepoResult<Option<User>> {
                let $this = self;
                Ok($lock.get_user(id))
            }

            async fn get_user_by_username(&self, username: &str) -> RepoResult<Option<User>> {
                let $this = self;
                Ok($lock.get_user_by_username(username))
            }

            async fn update_user(&self, user: &User) -> RepoResult<()> {
                let $this = self;
                $lock.update_user(user)
            }

            async fn delete_user(&self, id: Uuid) -> RepoResult<()> {
                let $this = self;
                $lock.delete_user(id)
            }

            async fn create_friend_connection(&self, user_id: Uuid, friend_id: Uuid) -> RepoResult<()> {
                let $this = self;
                $lock.create_friend_connection(user_id, friend_id)
            }

            async fn delete_friend_connection(&self, user_id: Uuid, friend_id: Uuid) -> RepoResult<()> {
                let $this = self;
                $lock.delete_friend_connection(user_id, friend_id)
            }

            async fn friend_connection_exists(&self, user_id: Uuid, friend_id: Uuid) -> RepoResult<bool> {
                let $this = self;
                Ok($lock.friend_connection_exists(user_id, friend_id))
            }

            async fn get_user_friends(&self, user_id: Uuid, page: Page) -> RepoResult<Vec<User>> {
                let $this = self;
                Ok($lock.get_user_friends(user_id, page))
            }

            async fn count_user_friends(&self, user_id: Uuid) -> RepoResult<i64> {
                let $this = self;
                Ok($lock.count_user_friends(user_id))
            }

            async fn create_friend_request(&self, request: &FriendRequest) -> RepoResult<()> {
                let $this = self;
                $lock.create_friend_request(request)
            }

            async fn get_friend_request(&self, id: Uuid) -> RepoResult<Option<FriendRequest>> {
                let $this = self;
                Ok($lock.get_friend_request(id))
            }

            async fn find_friend_request(
                &self,
                from_id: Uuid,
                to_id: Uuid,
            ) -> RepoResult<Option<FriendRequest>> {
                let $this = self;
                Ok($lock.find_friend_request(from_id, to_id))
            }

            async fn delete_friend_request(&self, id: Uuid) -> RepoResult<()> {
                let $this = self;
                $lock.delete_friend_request(id)
            }

            async fn get_incoming_friend_requests(
                &self,
                user_id: Uuid,
                page: Page,
            ) -> RepoResult<Vec<FriendRequest>> {
                let $this = self;
                Ok($lock.get_incoming_friend_requests(user_id, page))
            }

            async fn get_outgoing_friend_requests(
                &self,
                user_id: Uuid,
                page: Page,
            ) -> RepoResult<Vec<FriendRequest>> {
                let $this = self;
                Ok($lock.get_outgoing_friend_requests(user_id, page))
            }

            async fn count_incoming_friend_requests(&self, user_id: Uuid) -> RepoResult<i64> {
                let $this = self;
                Ok($lock.count_incoming_friend_requests(user_id))
            }

            async fn count_outgoing_friend_requests(&self, user_id: Uuid) -> RepoResult<i64> {
                let $this = self;
                Ok($lock.count_outgoing_friend_requests(user_id))
            }

            async fn create_chat(&self, chat: &Chat) -> RepoResult<()> {
                let $this = self;
                $lock.create_chat(chat)
            }

            async fn get_chat(&self, id: Uuid) -> RepoResult<Option<Chat>> {
                let $this = self;
                Ok($lock.get_chat(id))
            }

            async fn delete_chat(&self, id: Uuid) -> RepoResult<()> {
                let $this = self;
                $lock.delete_chat(id)
            }

            async fn create_chat_member(&self, member: &ChatMember) -> RepoResult<()> {
                let $this = self;
                $lock.create_chat_member(member)
            }

            async fn get_chat_member(&self, user_id: Uuid, chat_id: Uuid) -> RepoResult<Option<ChatMember>> {
                let $this = self;
                Ok($lock.get_chat_member(user_id, chat_id))
            }

            async fn delete_chat_member(&self, user_id: Uuid, chat_id: Uuid) -> RepoResult<()> {
                let $this = self;
                $lock.delete_chat_member(user_id, chat_id)
            }

            async fn get_chat_members(&self, chat_id: Uuid, page: Page) -> RepoResult<Vec<ChatMember>> {
                let $this = self;
                Ok($lock.get_chat_members(chat_id, page))
            }

            async fn count_chat_members(&self, chat_id: Uuid) -> RepoResult<i64> {
                let $this = self;
                Ok($lock.count_chat_members(chat_id))
            }

            async fn get_user_chats(&self, user_id: Uuid, page: Page) -> RepoResult<Vec<ChatMember>> {
                let $this = self;
                Ok($lock.get_user_chats(user_id, page))
            }

            async fn count_user_chats(&self, user_id: Uuid) -> RepoResult<i64> {
                let $this = self;
                Ok($lock.count_user_chats(user_id))
            }

            async fn create_message(&self, message: &Message) -> RepoResult<()> {
                let $this = self;
                $lock.create_message(message)
            }

            async fn get_message(&self, id: Uuid) -> RepoResult<Option<Message>> {
                let $this = self;
                Ok($lock.get_message(id))
            }

            async fn update_message(&self, message: &Message) -> RepoResult<()> {
                let $this = self;
                $lock.update_message(message)
            }

            async fn delete_message(&self, id: Uuid) -> RepoResult<()> {
                let $this = self;
                $lock.delete_message(id)
            }

            async fn get_chat_messages(&self, chat_id: Uuid, page: Page) -> RepoResult<Vec<Message>> {
                let $this = self;
                Ok($lock.get_chat_messages(chat_id, page))
            }

            async fn count_chat_messages(&self, chat_id: Uuid) -> RepoResult<i64> {
                let $this = self;
                Ok($lock.count_chat_messages(chat_id))
            }
        }
    };
}

impl_store!(MemoryRepository, |this| this.tables.lock().await);
impl_store!(MemoryTransaction, |this| this.working.lock());
