//! Friendship handlers
//!
//! Friend lists, the friend request flow and unfriending.

use axum::{extract::State, Json};
use social_service::FriendRequest;
use uuid::Uuid;

use super::{current_user, render_user};
use crate::dto::{FriendRequestCreate, FriendRequestResponse, ListResponse, UserResponse};
use crate::extractors::{IdPath, Pagination, Session, ValidatedJson};
use crate::response::{ApiResult, Created, NoContent};
use crate::state::AppState;

/// Friends of the current user
///
/// GET /users/@me/friends
pub async fn get_friends(
    State(state): State<AppState>,
    session: Session,
    pagination: Pagination,
) -> ApiResult<Json<ListResponse<UserResponse>>> {
    let ctx = session.context(&state).await?;
    let me = current_user(&ctx)?;
    let page = pagination.page();

    let mut friends = Vec::new();
    for connection in me.friends(&ctx, page).await? {
        let friend = connection.friend(&ctx).await?;
        friends.push(render_user(&ctx, friend).await?);
    }
    let total = me.count_friends(&ctx).await?;

    Ok(Json(ListResponse::new(friends, page.offset, total)))
}

/// End a friendship
///
/// DELETE /users/@me/friends/{user_id}
pub async fn remove_friend(
    State(state): State<AppState>,
    session: Session,
    IdPath(friend_id): IdPath<Uuid>,
) -> ApiResult<NoContent> {
    let ctx = session.context(&state).await?;
    let me = current_user(&ctx)?;
    me.friend(&ctx, friend_id).await?.delete(&ctx).await?;
    Ok(NoContent)
}

async fn render_requests(
    ctx: &social_service::Context<'_>,
    requests: Vec<FriendRequest<'_>>,
) -> ApiResult<Vec<FriendRequestResponse>> {
    let mut rendered = Vec::with_capacity(requests.len());
    for request in requests {
        rendered.push(request.details(ctx).await?.into());
    }
    Ok(rendered)
}

/// Pending requests sent to the current user
///
/// GET /users/@me/friend-requests/incoming
pub async fn get_incoming_requests(
    State(state): State<AppState>,
    session: Session,
    pagination: Pagination,
) -> ApiResult<Json<ListResponse<FriendRequestResponse>>> {
    let ctx = session.context(&state).await?;
    let me = current_user(&ctx)?;
    let page = pagination.page();

    let requests = me.incoming_friend_requests(&ctx, page).await?;
    let data = render_requests(&ctx, requests).await?;
    let total = me.count_incoming_friend_requests(&ctx).await?;

    Ok(Json(ListResponse::new(data, page.offset, total)))
}

/// Pending requests sent by the current user
///
/// GET /users/@me/friend-requests/outgoing
pub async fn get_outgoing_requests(
    State(state): State<AppState>,
    session: Session,
    pagination: Pagination,
) -> ApiResult<Json<ListResponse<FriendRequestResponse>>> {
    let ctx = session.context(&state).await?;
    let me = current_user(&ctx)?;
    let page = pagination.page();

    let requests = me.outgoing_friend_requests(&ctx, page).await?;
    let data = render_requests(&ctx, requests).await?;
    let total = me.count_outgoing_friend_requests(&ctx).await?;

    Ok(Json(ListResponse::new(data, page.offset, total)))
}

/// Send a friend request
///
/// POST /users/@me/friend-requests
pub async fn send_friend_request(
    State(state): State<AppState>,
    session: Session,
    ValidatedJson(body): ValidatedJson<FriendRequestCreate>,
) -> ApiResult<Created<Json<FriendRequestResponse>>> {
    let ctx = session.context(&state).await?;
    let me = current_user(&ctx)?;
    let request = me.send_friend_request(&ctx, body.user_id).await?;
    Ok(Created(Json(request.details(&ctx).await?.into())))
}

/// POST /friend-requests/{request_id}/accept
pub async fn accept_friend_request(
    State(state): State<AppState>,
    session: Session,
    IdPath(request_id): IdPath<Uuid>,
) -> ApiResult<NoContent> {
    let ctx = session.context(&state).await?;
    FriendRequest::load(&ctx, state.app(), request_id)
        .await?
        .accept(&ctx)
        .await?;
    Ok(NoContent)
}

/// POST /friend-requests/{request_id}/decline
pub async fn decline_friend_request(
    State(state): State<AppState>,
    session: Session,
    IdPath(request_id): IdPath<Uuid>,
) -> ApiResult<NoContent> {
    let ctx = session.context(&state).await?;
    FriendRequest::load(&ctx, state.app(), request_id)
        .await?
        .decline(&ctx)
        .await?;
    Ok(NoContent)
}

/// Withdraw a request the caller sent
///
/// DELETE /friend-requests/{request_id}
pub async fn withdraw_friend_request(
    State(state): State<AppState>,
    session: Session,
    IdPath(request_id): IdPath<Uuid>,
) -> ApiResult<NoContent> {
    let ctx = session.context(&state).await?;
    FriendRequest::load(&ctx, state.app(), request_id)
        .await?
        .delete(&ctx)
        .await?;
    Ok(NoContent)
}
