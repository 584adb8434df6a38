//! Chat member queries

use sqlx::PgConnection;
use tracing::instrument;
use uuid::Uuid;

use social_core::entities::ChatMember;
use social_core::traits::{Page, RepoResult};

use crate::mappers::members_from_models;
use crate::models::ChatMemberModel;

use super::error::{expect_affected, map_db_error, map_write_error};

#[instrument(skip(conn, member), fields(user_id = %member.user_id, chat_id = %member.chat_id))]
pub(crate) async fn create(conn: &mut PgConnection, member: &ChatMember) -> RepoResult<()> {
    sqlx::query(
        r"
        INSERT INTO chat_members (user_id, chat_id, status)
        VALUES ($1, $2, $3)
        ",
    )
    .bind(member.user_id)
    .bind(member.chat_id)
    .bind(member.status.code())
    .execute(conn)
    .await
    .map_err(|e| map_write_error(e, "user is already a member of this chat", "user or chat"))?;

    Ok(())
}

#[instrument(skip(conn))]
pub(crate) async fn find(
    conn: &mut PgConnection,
    user_id: Uuid,
    chat_id: Uuid,
) -> RepoResult<Option<ChatMember>> {
    let result = sqlx::query_as::<_, ChatMemberModel>(
        r"
        SELECT user_id, chat_id, status
        FROM chat_members
        WHERE user_id = $1 AND chat_id = $2
        ",
    )
    .bind(user_id)
    .bind(chat_id)
    .fetch_optional(conn)
    .await
    .map_err(map_db_error)?;

    result.map(ChatMember::try_from).transpose()
}

/// The member's messages in the chat go with the row
#[instrument(skip(conn))]
pub(crate) async fn delete(conn: &mut PgConnection, user_id: Uuid, chat_id: Uuid) -> RepoResult<()> {
    let result = sqlx::query("DELETE FROM chat_members WHERE user_id = $1 AND chat_id = $2")
        .bind(user_id)
        .bind(chat_id)
        .execute(conn)
        .await
        .map_err(map_db_error)?;

    expect_affected(result.rows_affected(), "chat member")
}

#[instrument(skip(conn))]
pub(crate) async fn find_by_chat(
    conn: &mut PgConnection,
    chat_id: Uuid,
    page: Page,
) -> RepoResult<Vec<ChatMember>> {
    let results = sqlx::query_as::<_, ChatMemberModel>(
        r"
        SELECT user_id, chat_id, status
        FROM chat_members
        WHERE chat_id = $1
        ORDER BY user_id
        OFFSET $2
        LIMIT $3
        ",
    )
    .bind(chat_id)
    .bind(page.offset)
    .bind(page.count)
    .fetch_all(conn)
    .await
    .map_err(map_db_error)?;

    members_from_models(results)
}

#[instrument(skip(conn))]
pub(crate) async fn count_by_chat(conn: &mut PgConnection, chat_id: Uuid) -> RepoResult<i64> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM chat_members WHERE chat_id = $1")
        .bind(chat_id)
        .fetch_one(conn)
        .await
        .map_err(map_db_error)
}

#[instrument(skip(conn))]
pub(crate) async fn find_by_user(
    conn: &mut PgConnection,
    user_id: Uuid,
    page: Page,
) -> RepoResult<Vec<ChatMember>> {
    let results = sqlx::query_as::<_, ChatMemberModel>(
        r"
        SELECT user_id, chat_id, status
        FROM chat_members
        WHERE user_id = $1
        ORDER BY chat_id
        OFFSET $2
        LIMIT $3
        ",
    )
    .bind(user_id)
    .bind(page.offset)
    .bind(page.count)
    .fetch_all(conn)
    .await
    .map_err(map_db_error)?;

    members_from_models(results)
}

#[instrument(skip(conn))]
pub(crate) async fn count_by_user(conn: &mut PgConnection, user_id: Uuid) -> RepoResult<i64> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM chat_members WHERE user_id = $1")
        .bind(user_id)
        .fetch_one(conn)
        .await
        .map_err(map_db_error)
}
