//! Chat handlers
//!
//! Chat lifecycle, membership and the message list of a chat.

use axum::{extract::State, Json};
use social_core::forms::{ChatCreation, SendMessage};
use social_core::MemberStatus;
use social_service::{Chat, ChatMember, Context};
use uuid::Uuid;

use super::current_user;
use crate::dto::{AddMemberRequest, ChatResponse, ListResponse, MemberResponse, MessageResponse};
use crate::extractors::{ChatMemberPath, IdPath, Pagination, Session, ValidatedJson};
use crate::response::{ApiResult, Created, NoContent};
use crate::state::AppState;

async fn render_member(ctx: &Context<'_>, member: ChatMember<'_>) -> ApiResult<MemberResponse> {
    Ok(MemberResponse {
        chat_id: member.chat_id(),
        user_id: member.user_id(),
        status: member.status(ctx).await?,
    })
}

async fn render_chat(ctx: &Context<'_>, chat: Chat<'_>) -> ApiResult<ChatResponse> {
    Ok(chat.model(ctx).await?.into())
}

/// Create a chat owned by the caller
///
/// POST /chats
pub async fn create_chat(
    State(state): State<AppState>,
    session: Session,
    ValidatedJson(form): ValidatedJson<ChatCreation>,
) -> ApiResult<Created<Json<ChatResponse>>> {
    let ctx = session.context(&state).await?;
    let chat = state.app().chats().create(&ctx, form).await?;
    Ok(Created(Json(render_chat(&ctx, chat).await?)))
}

/// GET /chats/{chat_id}
pub async fn get_chat(
    State(state): State<AppState>,
    session: Session,
    IdPath(chat_id): IdPath<Uuid>,
) -> ApiResult<Json<ChatResponse>> {
    let ctx = session.context(&state).await?;
    let chat = state.app().chats().get(&ctx, chat_id).await?;
    Ok(Json(render_chat(&ctx, chat).await?))
}

/// Delete a chat; owner only
///
/// DELETE /chats/{chat_id}
pub async fn delete_chat(
    State(state): State<AppState>,
    session: Session,
    IdPath(chat_id): IdPath<Uuid>,
) -> ApiResult<NoContent> {
    let ctx = session.context(&state).await?;
    state.app().chats().get(&ctx, chat_id).await?.delete(&ctx).await?;
    Ok(NoContent)
}

// ============================================================================
// Members
// ============================================================================

/// GET /chats/{chat_id}/members
pub async fn get_members(
    State(state): State<AppState>,
    session: Session,
    IdPath(chat_id): IdPath<Uuid>,
    pagination: Pagination,
) -> ApiResult<Json<ListResponse<MemberResponse>>> {
    let ctx = session.context(&state).await?;
    let chat = state.app().chats().get(&ctx, chat_id).await?;
    let page = pagination.page();

    let mut members = Vec::new();
    for member in chat.members(&ctx, page).await? {
        members.push(render_member(&ctx, member).await?);
    }
    let total = chat.count_members(&ctx).await?;

    Ok(Json(ListResponse::new(members, page.offset, total)))
}

/// Add a user to the chat
///
/// POST /chats/{chat_id}/members
pub async fn add_member(
    State(state): State<AppState>,
    session: Session,
    IdPath(chat_id): IdPath<Uuid>,
    ValidatedJson(body): ValidatedJson<AddMemberRequest>,
) -> ApiResult<Created<Json<MemberResponse>>> {
    let ctx = session.context(&state).await?;
    let chat = state.app().chats().get(&ctx, chat_id).await?;
    let member = chat.add(&ctx, body.user_id, MemberStatus::Active).await?;
    Ok(Created(Json(render_member(&ctx, member).await?)))
}

/// Leave the chat, or remove a member as the owner
///
/// DELETE /chats/{chat_id}/members/{user_id}
pub async fn remove_member(
    State(state): State<AppState>,
    session: Session,
    IdPath(path): IdPath<ChatMemberPath>,
) -> ApiResult<NoContent> {
    let ctx = session.context(&state).await?;
    let chat = state.app().chats().get(&ctx, path.chat_id).await?;
    chat.member(&ctx, path.user_id).await?.delete(&ctx).await?;
    Ok(NoContent)
}

// ============================================================================
// Messages
// ============================================================================

/// Messages of the chat, newest first
///
/// GET /chats/{chat_id}/messages
pub async fn get_messages(
    State(state): State<AppState>,
    session: Session,
    IdPath(chat_id): IdPath<Uuid>,
    pagination: Pagination,
) -> ApiResult<Json<ListResponse<MessageResponse>>> {
    let ctx = session.context(&state).await?;
    let chat = state.app().chats().get(&ctx, chat_id).await?;
    let page = pagination.page();

    let mut messages = Vec::new();
    for message in chat.messages(&ctx, page).await? {
        messages.push(message.view(&ctx).await?.into());
    }
    let total = chat.count_messages(&ctx).await?;

    Ok(Json(ListResponse::new(messages, page.offset, total)))
}

/// Post a message as the caller
///
/// POST /chats/{chat_id}/messages
pub async fn send_message(
    State(state): State<AppState>,
    session: Session,
    IdPath(chat_id): IdPath<Uuid>,
    ValidatedJson(form): ValidatedJson<SendMessage>,
) -> ApiResult<Created<Json<MessageResponse>>> {
    let ctx = session.context(&state).await?;
    let me = current_user(&ctx)?;
    let chat = state.app().chats().get(&ctx, chat_id).await?;

    // Rejects non-members before the membership lookup can report a 404
    chat.model(&ctx).await?;
    let member = chat.member(&ctx, me.id()).await?;
    let message = member.send_message(&ctx, form).await?;

    Ok(Created(Json(message.model(&ctx).await?.into())))
}
