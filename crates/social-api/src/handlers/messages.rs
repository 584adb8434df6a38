//! Message handlers
//!
//! Single-message reads and edits. These are author-only; other members see
//! messages through the chat listing.

use axum::{extract::State, Json};
use social_core::forms::MessageUpdate;
use uuid::Uuid;

use crate::dto::MessageResponse;
use crate::extractors::{IdPath, Session, ValidatedJson};
use crate::response::{ApiResult, NoContent};
use crate::state::AppState;

/// GET /messages/{message_id}
pub async fn get_message(
    State(state): State<AppState>,
    session: Session,
    IdPath(message_id): IdPath<Uuid>,
) -> ApiResult<Json<MessageResponse>> {
    let ctx = session.context(&state).await?;
    let message = state.app().chats().get_message(&ctx, message_id).await?;
    Ok(Json(message.model(&ctx).await?.into()))
}

/// Edit the payload
///
/// PATCH /messages/{message_id}
pub async fn update_message(
    State(state): State<AppState>,
    session: Session,
    IdPath(message_id): IdPath<Uuid>,
    ValidatedJson(form): ValidatedJson<MessageUpdate>,
) -> ApiResult<Json<MessageResponse>> {
    let ctx = session.context(&state).await?;
    let message = state.app().chats().get_message(&ctx, message_id).await?;
    message.update(&ctx, form).await?;
    Ok(Json(message.model(&ctx).await?.into()))
}

/// DELETE /messages/{message_id}
pub async fn delete_message(
    State(state): State<AppState>,
    session: Session,
    IdPath(message_id): IdPath<Uuid>,
) -> ApiResult<NoContent> {
    let ctx = session.context(&state).await?;
    let message = state.app().chats().get_message(&ctx, message_id).await?;
    message.delete(&ctx).await?;
    Ok(NoContent)
}
