//! Friend request facade
//!
//! A pending request ends in one of three ways: accepted or declined by the
//! recipient, or withdrawn by the sender. The row is deleted in every case.
//! Concurrent transitions on the same request are first-writer-wins: the
//! loser's delete finds no row and fails with `DoesNotExist`, and no event
//! is published for it.

use std::fmt;

use futures::FutureExt;
use tracing::{info, instrument};
use uuid::Uuid;

use social_core::entities;
use social_core::events::{FriendEvent, FriendRequestUpdateEvent};
use social_core::{DomainError, DomainEvent, FriendRequestUpdateCode};

use super::app::App;
use super::context::Context;
use super::error::{ServiceError, ServiceResult};
use super::user::User;

#[derive(Clone, Copy)]
pub struct FriendRequest<'a> {
    app: &'a App,
    id: Uuid,
}

impl<'a> FriendRequest<'a> {
    pub async fn load(ctx: &Context<'_>, app: &'a App, id: Uuid) -> ServiceResult<Self> {
        let request = Self { app, id };
        request.fetch(ctx).await?;
        Ok(request)
    }

    /// Wrap a row fetched by a trusted caller without re-checking existence
    pub fn from_model_unchecked(app: &'a App, model: &entities::FriendRequest) -> Self {
        Self { app, id: model.id }
    }

    #[inline]
    pub fn id(&self) -> Uuid {
        self.id
    }

    async fn fetch(&self, ctx: &Context<'_>) -> ServiceResult<entities::FriendRequest> {
        ctx.run(self.app.repo().get_friend_request(self.id))
            .await?
            .ok_or_else(|| DomainError::DoesNotExist("friend request").into())
    }

    /// The row, readable by either endpoint
    pub async fn details(&self, ctx: &Context<'_>) -> ServiceResult<entities::FriendRequest> {
        let caller = ctx.caller_id().ok_or(DomainError::ResourceInaccessible)?;
        let model = self.fetch(ctx).await?;
        if model.involves(caller) {
            Ok(model)
        } else {
            Err(DomainError::ResourceInaccessible.into())
        }
    }

    pub async fn from(&self, ctx: &Context<'_>) -> ServiceResult<User<'a>> {
        let model = self.details(ctx).await?;
        User::load(ctx, self.app, model.from_id).await
    }

    pub async fn to(&self, ctx: &Context<'_>) -> ServiceResult<User<'a>> {
        let model = self.details(ctx).await?;
        User::load(ctx, self.app, model.to_id).await
    }

    /// Load the request and check the caller is the endpoint allowed to
    /// perform this transition
    async fn fetch_as(
        &self,
        ctx: &Context<'_>,
        endpoint: impl Fn(&entities::FriendRequest) -> Uuid,
    ) -> ServiceResult<entities::FriendRequest> {
        let caller = ctx.require_caller()?;
        let model = self.fetch(ctx).await?;
        if endpoint(&model) == caller {
            Ok(model)
        } else {
            Err(DomainError::RightsViolation.into())
        }
    }

    /// Accept the request: creates the friend connection and consumes the
    /// request in one transaction
    #[instrument(skip(self, ctx), fields(request_id = %self.id))]
    pub async fn accept(&self, ctx: &Context<'_>) -> ServiceResult<()> {
        let model = self.fetch_as(ctx, |r| r.to_id).await?;

        let (id, from, to) = (model.id, model.from_id, model.to_id);
        self.app
            .transaction(ctx, move |tx| {
                async move {
                    tx.delete_friend_request(id).await?;
                    tx.create_friend_connection(from, to).await?;
                    Ok::<(), ServiceError>(())
                }
                .boxed()
            })
            .await?;

        info!(from_id = %from, to_id = %to, "Friend request accepted");

        self.app.emit(DomainEvent::FriendAdded(FriendEvent {
            friend_id: from,
            user_id: to,
        }));
        self.emit_update(&model, FriendRequestUpdateCode::Accepted);
        Ok(())
    }

    #[instrument(skip(self, ctx), fields(request_id = %self.id))]
    pub async fn decline(&self, ctx: &Context<'_>) -> ServiceResult<()> {
        let model = self.fetch_as(ctx, |r| r.to_id).await?;
        ctx.run(self.app.repo().delete_friend_request(model.id)).await?;

        info!("Friend request declined");
        self.emit_update(&model, FriendRequestUpdateCode::Declined);
        Ok(())
    }

    /// Withdraw the request; only the sender may do this
    #[instrument(skip(self, ctx), fields(request_id = %self.id))]
    pub async fn delete(&self, ctx: &Context<'_>) -> ServiceResult<()> {
        let model = self.fetch_as(ctx, |r| r.from_id).await?;
        ctx.run(self.app.repo().delete_friend_request(model.id)).await?;

        info!("Friend request withdrawn");
        self.emit_update(&model, FriendRequestUpdateCode::Withdrawn);
        Ok(())
    }

    fn emit_update(&self, model: &entities::FriendRequest, code: FriendRequestUpdateCode) {
        self.app
            .emit(DomainEvent::FriendRequestUpdate(FriendRequestUpdateEvent {
                friend_request_id: model.id,
                from: model.from_id,
                to: model.to_id,
                code,
            }));
    }
}

impl PartialEq for FriendRequest<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for FriendRequest<'_> {}

impl fmt::Debug for FriendRequest<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FriendRequest").field("id", &self.id).finish()
    }
}
