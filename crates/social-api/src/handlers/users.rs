//! User handlers
//!
//! Endpoints for the caller's own account and public user lookups.

use axum::{extract::State, Json};
use axum_extra::extract::CookieJar;
use social_core::forms::UserUpdate;
use uuid::Uuid;

use super::auth::clear_session;
use super::{current_user, render_user};
use crate::dto::{ChatResponse, ListResponse, UserResponse};
use crate::extractors::{IdPath, Pagination, Session, ValidatedJson};
use crate::response::{ApiResult, NoContent};
use crate::state::AppState;

/// Get current user
///
/// GET /users/@me
pub async fn get_current_user(
    State(state): State<AppState>,
    session: Session,
) -> ApiResult<Json<UserResponse>> {
    let ctx = session.context(&state).await?;
    let me = current_user(&ctx)?;
    Ok(Json(render_user(&ctx, me).await?))
}

/// Rename the current user
///
/// PATCH /users/@me
pub async fn update_current_user(
    State(state): State<AppState>,
    session: Session,
    ValidatedJson(form): ValidatedJson<UserUpdate>,
) -> ApiResult<Json<UserResponse>> {
    let ctx = session.context(&state).await?;
    let me = current_user(&ctx)?;
    me.update(&ctx, form).await?;
    Ok(Json(render_user(&ctx, me).await?))
}

/// Delete the current account and everything it owns
///
/// DELETE /users/@me
pub async fn delete_current_user(
    State(state): State<AppState>,
    session: Session,
    jar: CookieJar,
) -> ApiResult<(CookieJar, NoContent)> {
    let ctx = session.context(&state).await?;
    current_user(&ctx)?.delete(&ctx).await?;
    Ok((clear_session(jar), NoContent))
}

/// Get user by ID
///
/// GET /users/{user_id}
pub async fn get_user(
    State(state): State<AppState>,
    session: Session,
    IdPath(user_id): IdPath<Uuid>,
) -> ApiResult<Json<UserResponse>> {
    let ctx = session.context(&state).await?;
    let user = state.app().users().get(&ctx, user_id).await?;
    Ok(Json(render_user(&ctx, user).await?))
}

/// Chats the current user is a member of
///
/// GET /users/@me/chats
pub async fn get_current_user_chats(
    State(state): State<AppState>,
    session: Session,
    pagination: Pagination,
) -> ApiResult<Json<ListResponse<ChatResponse>>> {
    let ctx = session.context(&state).await?;
    let me = current_user(&ctx)?;
    let page = pagination.page();

    let mut chats = Vec::new();
    for membership in me.chats(&ctx, page).await? {
        let chat = membership.chat(&ctx).await?;
        chats.push(chat.model(&ctx).await?.into());
    }
    let total = me.count_chats(&ctx).await?;

    Ok(Json(ListResponse::new(chats, page.offset, total)))
}
