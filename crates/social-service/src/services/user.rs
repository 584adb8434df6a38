//! User facade
//!
//! Account-level reads, profile updates and the sending side of the friend
//! request flow.

use std::fmt;

use futures::FutureExt;
use tracing::{info, instrument};
use uuid::Uuid;
use validator::Validate;

use social_core::entities::{self, FriendRequest as FriendRequestRow};
use social_core::events::FriendRequestEvent;
use social_core::forms::UserUpdate;
use social_core::{DomainError, DomainEvent, Page};

use super::app::App;
use super::context::Context;
use super::error::{ServiceError, ServiceResult};
use super::friend_connection::FriendConnection;
use super::friend_request::FriendRequest;
use super::member::ChatMember;

/// View of one user account
#[derive(Clone, Copy)]
pub struct User<'a> {
    app: &'a App,
    id: Uuid,
}

impl<'a> User<'a> {
    /// Look the user up, failing with `DoesNotExist` if it is gone
    pub async fn load(ctx: &Context<'_>, app: &'a App, id: Uuid) -> ServiceResult<Self> {
        let user = Self { app, id };
        user.model(ctx).await?;
        Ok(user)
    }

    /// Wrap a row fetched by a trusted caller without re-checking existence
    pub fn from_model_unchecked(app: &'a App, model: &entities::User) -> Self {
        Self { app, id: model.id }
    }

    #[inline]
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// The stored row, including the password hash
    pub(crate) async fn model(&self, ctx: &Context<'_>) -> ServiceResult<entities::User> {
        ctx.run(self.app.repo().get_user(self.id))
            .await?
            .ok_or(DomainError::DoesNotExist("user").into())
    }

    /// Only the user themselves may change or delete the account
    fn require_self(&self, ctx: &Context<'_>) -> Result<(), DomainError> {
        if ctx.require_caller()? == self.id {
            Ok(())
        } else {
            Err(DomainError::ResourceInaccessible)
        }
    }

    pub async fn username(&self, ctx: &Context<'_>) -> ServiceResult<String> {
        Ok(self.model(ctx).await?.username)
    }

    #[instrument(skip(self, ctx, form), fields(user_id = %self.id))]
    pub async fn update(&self, ctx: &Context<'_>, form: UserUpdate) -> ServiceResult<()> {
        self.require_self(ctx)?;
        form.validate()?;

        let mut model = self.model(ctx).await?;
        model.set_username(form.username);
        ctx.run(self.app.repo().update_user(&model)).await?;

        info!("User updated");
        Ok(())
    }

    #[instrument(skip(self, ctx), fields(user_id = %self.id))]
    pub async fn delete(&self, ctx: &Context<'_>) -> ServiceResult<()> {
        self.require_self(ctx)?;
        ctx.run(self.app.repo().delete_user(self.id)).await?;

        info!("User deleted");
        Ok(())
    }

    // ========================================================================
    // Chats
    // ========================================================================

    /// Memberships of this user
    pub async fn chats(&self, ctx: &Context<'_>, page: Page) -> ServiceResult<Vec<ChatMember<'a>>> {
        self.model(ctx).await?;
        let members = ctx.run(self.app.repo().get_user_chats(self.id, page)).await?;
        Ok(members
            .iter()
            .map(|m| ChatMember::from_model_unchecked(self.app, m))
            .collect())
    }

    pub async fn count_chats(&self, ctx: &Context<'_>) -> ServiceResult<i64> {
        self.model(ctx).await?;
        ctx.run(self.app.repo().count_user_chats(self.id)).await
    }

    // ========================================================================
    // Friends
    // ========================================================================

    pub async fn friends(
        &self,
        ctx: &Context<'_>,
        page: Page,
    ) -> ServiceResult<Vec<FriendConnection<'a>>> {
        self.model(ctx).await?;
        let friends = ctx.run(self.app.repo().get_user_friends(self.id, page)).await?;
        Ok(friends
            .iter()
            .map(|friend| FriendConnection::from_ids_unchecked(self.app, self.id, friend.id))
            .collect())
    }

    pub async fn count_friends(&self, ctx: &Context<'_>) -> ServiceResult<i64> {
        self.model(ctx).await?;
        ctx.run(self.app.repo().count_user_friends(self.id)).await
    }

    /// The connection between this user and `friend_id`
    pub async fn friend(&self, ctx: &Context<'_>, friend_id: Uuid) -> ServiceResult<FriendConnection<'a>> {
        FriendConnection::load(ctx, self.app, self.id, friend_id).await
    }

    // ========================================================================
    // Friend requests
    // ========================================================================

    pub async fn incoming_friend_requests(
        &self,
        ctx: &Context<'_>,
        page: Page,
    ) -> ServiceResult<Vec<FriendRequest<'a>>> {
        self.model(ctx).await?;
        let requests = ctx
            .run(self.app.repo().get_incoming_friend_requests(self.id, page))
            .await?;
        Ok(self.wrap_requests(&requests))
    }

    pub async fn outgoing_friend_requests(
        &self,
        ctx: &Context<'_>,
        page: Page,
    ) -> ServiceResult<Vec<FriendRequest<'a>>> {
        self.model(ctx).await?;
        let requests = ctx
            .run(self.app.repo().get_outgoing_friend_requests(self.id, page))
            .await?;
        Ok(self.wrap_requests(&requests))
    }

    /// The pending request `from` sent to this user
    pub async fn incoming_friend_request(
        &self,
        ctx: &Context<'_>,
        from: Uuid,
    ) -> ServiceResult<FriendRequest<'a>> {
        self.find_request(ctx, from, self.id).await
    }

    /// The pending request this user sent to `to`
    pub async fn outgoing_friend_request(
        &self,
        ctx: &Context<'_>,
        to: Uuid,
    ) -> ServiceResult<FriendRequest<'a>> {
        self.find_request(ctx, self.id, to).await
    }

    pub async fn count_incoming_friend_requests(&self, ctx: &Context<'_>) -> ServiceResult<i64> {
        self.model(ctx).await?;
        ctx.run(self.app.repo().count_incoming_friend_requests(self.id))
            .await
    }

    pub async fn count_outgoing_friend_requests(&self, ctx: &Context<'_>) -> ServiceResult<i64> {
        self.model(ctx).await?;
        ctx.run(self.app.repo().count_outgoing_friend_requests(self.id))
            .await
    }

    /// Ask `to` for friendship
    ///
    /// Only callable on the caller's own facade. Fails with `Conflict` when a
    /// request already exists in either direction or the two users are
    /// already friends.
    #[instrument(skip(self, ctx), fields(user_id = %self.id))]
    pub async fn send_friend_request(
        &self,
        ctx: &Context<'_>,
        to: Uuid,
    ) -> ServiceResult<FriendRequest<'a>> {
        let caller = ctx.require_caller()?;
        if caller != self.id {
            return Err(DomainError::RightsViolation.into());
        }
        if to == caller {
            return Err(DomainError::conflict("cannot send a friend request to yourself").into());
        }
        User::load(ctx, self.app, to).await?;

        let request = FriendRequestRow::new(caller, to);
        let stored = request.clone();
        self.app
            .transaction(ctx, move |tx| {
                async move {
                    if tx.find_friend_request(caller, to).await?.is_some() {
                        return Err(DomainError::conflict("friend request already exists").into());
                    }
                    if tx.find_friend_request(to, caller).await?.is_some() {
                        return Err(DomainError::conflict(
                            "this user has already sent you a friend request",
                        )
                        .into());
                    }
                    if tx.friend_connection_exists(caller, to).await? {
                        return Err(DomainError::conflict("already friends").into());
                    }
                    tx.create_friend_request(&stored).await?;
                    Ok::<(), ServiceError>(())
                }
                .boxed()
            })
            .await?;

        info!(request_id = %request.id, to_id = %to, "Friend request sent");

        self.app.emit(DomainEvent::FriendRequest(FriendRequestEvent {
            from_id: caller,
            to_id: to,
            id: request.id,
        }));

        Ok(FriendRequest::from_model_unchecked(self.app, &request))
    }

    async fn find_request(
        &self,
        ctx: &Context<'_>,
        from: Uuid,
        to: Uuid,
    ) -> ServiceResult<FriendRequest<'a>> {
        let request = ctx
            .run(self.app.repo().find_friend_request(from, to))
            .await?
            .ok_or(DomainError::DoesNotExist("friend request"))?;
        Ok(FriendRequest::from_model_unchecked(self.app, &request))
    }

    fn wrap_requests(&self, requests: &[FriendRequestRow]) -> Vec<FriendRequest<'a>> {
        requests
            .iter()
            .map(|r| FriendRequest::from_model_unchecked(self.app, r))
            .collect()
    }
}

impl PartialEq for User<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for User<'_> {}

impl fmt::Debug for User<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User").field("id", &self.id).finish()
    }
}
