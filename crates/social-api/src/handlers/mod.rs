//! HTTP request handlers
//!
//! Each handler resolves the session into a service `Context` and drives the
//! facades; all authorization lives in the service layer.

pub mod auth;
pub mod chats;
pub mod events;
pub mod friends;
pub mod health;
pub mod messages;
pub mod users;

use social_core::DomainError;
use social_service::{Context, User};

use crate::dto::UserResponse;
use crate::response::ApiResult;

/// The authenticated caller, or `NotAuthorized`
pub(crate) fn current_user<'a>(ctx: &Context<'a>) -> ApiResult<User<'a>> {
    Ok(ctx.caller().copied().ok_or(DomainError::NotAuthorized)?)
}

pub(crate) async fn render_user(ctx: &Context<'_>, user: User<'_>) -> ApiResult<UserResponse> {
    Ok(UserResponse::new(user.id(), user.username(ctx).await?))
}
