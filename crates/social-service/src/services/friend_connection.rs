//! Friend connection facade

use std::fmt;

use tracing::{info, instrument};
use uuid::Uuid;

use social_core::events::FriendEvent;
use social_core::{DomainError, DomainEvent};

use super::app::App;
use super::context::Context;
use super::error::ServiceResult;
use super::user::User;

/// The friendship between `user_id` and `friend_id`, seen from `user_id`
#[derive(Clone, Copy)]
pub struct FriendConnection<'a> {
    app: &'a App,
    user_id: Uuid,
    friend_id: Uuid,
}

impl<'a> FriendConnection<'a> {
    pub async fn load(
        ctx: &Context<'_>,
        app: &'a App,
        user_id: Uuid,
        friend_id: Uuid,
    ) -> ServiceResult<Self> {
        let exists = ctx
            .run(app.repo().friend_connection_exists(user_id, friend_id))
            .await?;
        if !exists {
            return Err(DomainError::DoesNotExist("friend connection").into());
        }
        Ok(Self::from_ids_unchecked(app, user_id, friend_id))
    }

    /// Build the facade for a pair known to be connected
    pub fn from_ids_unchecked(app: &'a App, user_id: Uuid, friend_id: Uuid) -> Self {
        Self {
            app,
            user_id,
            friend_id,
        }
    }

    #[inline]
    pub fn user_id(&self) -> Uuid {
        self.user_id
    }

    #[inline]
    pub fn friend_id(&self) -> Uuid {
        self.friend_id
    }

    pub async fn user(&self, ctx: &Context<'_>) -> ServiceResult<User<'a>> {
        User::load(ctx, self.app, self.user_id).await
    }

    pub async fn friend(&self, ctx: &Context<'_>) -> ServiceResult<User<'a>> {
        User::load(ctx, self.app, self.friend_id).await
    }

    /// End the friendship; either party may do this
    #[instrument(skip(self, ctx), fields(user_id = %self.user_id, friend_id = %self.friend_id))]
    pub async fn delete(&self, ctx: &Context<'_>) -> ServiceResult<()> {
        let caller = ctx.caller_id().ok_or(DomainError::ResourceInaccessible)?;
        if caller != self.user_id && caller != self.friend_id {
            return Err(DomainError::ResourceInaccessible.into());
        }

        ctx.run(
            self.app
                .repo()
                .delete_friend_connection(self.user_id, self.friend_id),
        )
        .await?;

        info!("Friend removed");
        self.app.emit(DomainEvent::FriendDeleted(FriendEvent {
            friend_id: self.friend_id,
            user_id: self.user_id,
        }));
        Ok(())
    }
}

/// Connections are unordered: (a, b) equals (b, a)
impl PartialEq for FriendConnection<'_> {
    fn eq(&self, other: &Self) -> bool {
        social_core::FriendConnection::new(self.user_id, self.friend_id).key()
            == social_core::FriendConnection::new(other.user_id, other.friend_id).key()
    }
}

impl Eq for FriendConnection<'_> {}

impl fmt::Debug for FriendConnection<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FriendConnection")
            .field("user_id", &self.user_id)
            .field("friend_id", &self.friend_id)
            .finish()
    }
}
