//! PostgreSQL repository and transaction
//!
//! Both types run the same queries; they differ only in where the connection
//! comes from. `PgRepository` checks one out of the pool per call, while
//! `PgTransaction` reuses the connection its transaction is open on.

use std::ops::{Deref, DerefMut};

use async_trait::async_trait;
use sqlx::pool::PoolConnection;
use sqlx::{PgConnection, PgPool, Postgres};
use tokio::sync::{Mutex, MutexGuard};
use tracing::instrument;
use uuid::Uuid;

use social_core::entities::{Chat, ChatMember, FriendRequest, Message, User};
use social_core::traits::{Page, RepoResult, Repository, Store, Transaction};

use super::error::map_db_error;
use super::{chat, friend, member, message, user};

const SCHEMA: &str = include_str!("../../migrations/0001_init.sql");

/// Connection handed to the query functions
enum Conn<'a> {
    Pooled(PoolConnection<Postgres>),
    Tx(MutexGuard<'a, sqlx::Transaction<'static, Postgres>>),
}

impl Deref for Conn<'_> {
    type Target = PgConnection;

    fn deref(&self) -> &PgConnection {
        match self {
            Self::Pooled(conn) => &**conn,
            Self::Tx(tx) => &***tx,
        }
    }
}

impl DerefMut for Conn<'_> {
    fn deref_mut(&mut self) -> &mut PgConnection {
        match self {
            Self::Pooled(conn) => &mut **conn,
            Self::Tx(tx) => &mut ***tx,
        }
    }
}

/// PostgreSQL-backed repository
#[derive(Clone)]
pub struct PgRepository {
    pool: PgPool,
}

impl PgRepository {
    /// Create a new PgRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Create the tables and indexes if they do not exist yet
    #[instrument(skip(self))]
    pub async fn init_schema(&self) -> RepoResult<()> {
        sqlx::raw_sql(SCHEMA)
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        tracing::info!("Database schema ready");
        Ok(())
    }

    async fn conn(&self) -> RepoResult<Conn<'_>> {
        let conn = self.pool.acquire().await.map_err(map_db_error)?;
        Ok(Conn::Pooled(conn))
    }
}

/// An open serializable transaction
pub struct PgTransaction {
    tx: Mutex<sqlx::Transaction<'static, Postgres>>,
}

impl PgTransaction {
    async fn conn(&self) -> RepoResult<Conn<'_>> {
        Ok(Conn::Tx(self.tx.lock().await))
    }
}

#[async_trait]
impl Repository for PgRepository {
    #[instrument(skip(self))]
    async fn begin(&self) -> RepoResult<Box<dyn Transaction>> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        // Check-then-insert sequences (friend requests) rely on this.
        sqlx::query("SET TRANSACTION ISOLATION LEVEL SERIALIZABLE")
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?;

        Ok(Box::new(PgTransaction { tx: Mutex::new(tx) }))
    }
}

#[async_trait]
impl Transaction for PgTransaction {
    async fn commit(self: Box<Self>) -> RepoResult<()> {
        self.tx.into_inner().commit().await.map_err(map_db_error)
    }

    async fn rollback(self: Box<Self>) -> RepoResult<()> {
        self.tx.into_inner().rollback().await.map_err(map_db_error)
    }
}

macro_rules! impl_store {
    ($ty:ty) => {
        #[async_trait]
        impl Store for $ty {
            async fn create_user(&self, u: &User) -> RepoResult<()> {
                user::create(&mut *self.conn().await?, u).await
            }

            async fn get_user(&self, id: Uuid) -> RepoResult<Option<User>> {
                user::find_by_id(&mut *self.conn().await?, id).await
            }

            async fn get_user_by_username(&self, username: &str) -> RepoResult<Option<User>> {
                user::find_by_username(&mut *self.conn().await?, username).await
            }

            async fn update_user(&self, u: &User) -> RepoResult<()> {
                user::update(&mut *self.conn().await?, u).await
            }

            async fn delete_user(&self, id: Uuid) -> RepoResult<()> {
                user::delete(&mut *self.conn().await?, id).await
            }

            async fn create_friend_connection(&self, user_id: Uuid, friend_id: Uuid) -> RepoResult<()> {
                friend::create_connection(&mut *self.conn().await?, user_id, friend_id).await
            }

            async fn delete_friend_connection(&self, user_id: Uuid, friend_id: Uuid) -> RepoResult<()> {
                friend::delete_connection(&mut *self.conn().await?, user_id, friend_id).await
            }

            async fn friend_connection_exists(&self, user_id: Uuid, friend_id: Uuid) -> RepoResult<bool> {
                friend::connection_exists(&mut *self.conn().await?, user_id, friend_id).await
            }

            async fn get_user_friends(&self, user_id: Uuid, page: Page) -> RepoResult<Vec<User>> {
                user::find_friends(&mut *self.conn().await?, user_id, page).await
            }

            async fn count_user_friends(&self, user_id: Uuid) -> RepoResult<i64> {
                friend::count_connections(&mut *self.conn().await?, user_id).await
            }

            async fn create_friend_request(&self, request: &FriendRequest) -> RepoResult<()> {
                friend::create_request(&mut *self.conn().await?, request).await
            }

            async fn get_friend_request(&self, id: Uuid) -> RepoResult<Option<FriendRequest>> {
                friend::find_request(&mut *self.conn().await?, id).await
            }

            async fn find_friend_request(
                &self,
                from_id: Uuid,
                to_id: Uuid,
            ) -> RepoResult<Option<FriendRequest>> {
                friend::find_request_between(&mut *self.conn().await?, from_id, to_id).await
            }

            async fn delete_friend_request(&self, id: Uuid) -> RepoResult<()> {
                friend::delete_request(&mut *self.conn().await?, id).await
            }

            async fn get_incoming_friend_requests(
                &self,
                user_id: Uuid,
                page: Page,
            ) -> RepoResult<Vec<FriendRequest>> {
                friend::find_incoming(&mut *self.conn().await?, user_id, page).await
            }

            async fn get_outgoing_friend_requests(
                &self,
                user_id: Uuid,
                page: Page,
            ) -> RepoResult<Vec<FriendRequest>> {
                friend::find_outgoing(&mut *self.conn().await?, user_id, page).await
            }

            async fn count_incoming_friend_requests(&self, user_id: Uuid) -> RepoResult<i64> {
                friend::count_incoming(&mut *self.conn().await?, user_id).await
            }

            async fn count_outgoing_friend_requests(&self, user_id: Uuid) -> RepoResult<i64> {
                friend::count_outgoing(&mut *self.conn().await?, user_id).await
            }

            async fn create_chat(&self, c: &Chat) -> RepoResult<()> {
                chat::create(&mut *self.conn().await?, c).await
            }

            async fn get_chat(&self, id: Uuid) -> RepoResult<Option<Chat>> {
                chat::find_by_id(&mut *self.conn().await?, id).await
            }

            async fn delete_chat(&self, id: Uuid) -> RepoResult<()> {
                chat::delete(&mut *self.conn().await?, id).await
            }

            async fn create_chat_member(&self, m: &ChatMember) -> RepoResult<()> {
                member::create(&mut *self.conn().await?, m).await
            }

            async fn get_chat_member(&self, user_id: Uuid, chat_id: Uuid) -> RepoResult<Option<ChatMember>> {
                member::find(&mut *self.conn().await?, user_id, chat_id).await
            }

            async fn delete_chat_member(&self, user_id: Uuid, chat_id: Uuid) -> RepoResult<()> {
                member::delete(&mut *self.conn().await?, user_id, chat_id).await
            }

            async fn get_chat_members(&self, chat_id: Uuid, page: Page) -> RepoResult<Vec<ChatMember>> {
                member::find_by_chat(&mut *self.conn().await?, chat_id, page).await
            }

            async fn count_chat_members(&self, chat_id: Uuid) -> RepoResult<i64> {
                member::count_by_chat(&mut *self.conn().await?, chat_id).await
            }

            async fn get_user_chats(&self, user_id: Uuid, page: Page) -> RepoResult<Vec<ChatMember>> {
                member::find_by_user(&mut *self.conn().await?, user_id, page).await
            }

            async fn count_user_chats(&self, user_id: Uuid) -> RepoResult<i64> {
                member::count_by_user(&mut *self.conn().await?, user_id).await
            }

            async fn create_message(&self, m: &Message) -> RepoResult<()> {
                message::create(&mut *self.conn().await?, m).await
            }

            async fn get_message(&self, id: Uuid) -> RepoResult<Option<Message>> {
                message::find_by_id(&mut *self.conn().await?, id).await
            }

            async fn update_message(&self, m: &Message) -> RepoResult<()> {
                message::update(&mut *self.conn().await?, m).await
            }

            async fn delete_message(&self, id: Uuid) -> RepoResult<()> {
                message::delete(&mut *self.conn().await?, id).await
            }

            async fn get_chat_messages(&self, chat_id: Uuid, page: Page) -> RepoResult<Vec<Message>> {
                message::find_by_chat(&mut *self.conn().await?, chat_id, page).await
            }

            async fn count_chat_messages(&self, chat_id: Uuid) -> RepoResult<i64> {
                message::count_by_chat(&mut *self.conn().await?, chat_id).await
            }
        }
    };
}

impl_store!(PgRepository);
impl_store!(PgTransaction);
