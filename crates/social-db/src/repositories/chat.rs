//! Chat queries

use sqlx::PgConnection;
use tracing::instrument;
use uuid::Uuid;

use social_core::entities::Chat;
use social_core::traits::RepoResult;

use crate::models::ChatModel;

use super::error::{expect_affected, map_db_error, map_write_error};

#[instrument(skip(conn, chat), fields(chat_id = %chat.id))]
pub(crate) async fn create(conn: &mut PgConnection, chat: &Chat) -> RepoResult<()> {
    sqlx::query(
        r"
        INSERT INTO chats (id, name, description, owner_id)
        VALUES ($1, $2, $3, $4)
        ",
    )
    .bind(chat.id)
    .bind(&chat.name)
    .bind(&chat.description)
    .bind(chat.owner_id)
    .execute(conn)
    .await
    .map_err(|e| map_write_error(e, "chat already exists", "user"))?;

    Ok(())
}

#[instrument(skip(conn))]
pub(crate) async fn find_by_id(conn: &mut PgConnection, id: Uuid) -> RepoResult<Option<Chat>> {
    let result = sqlx::query_as::<_, ChatModel>(
        r"
        SELECT id, name, description, owner_id
        FROM chats
        WHERE id = $1
        ",
    )
    .bind(id)
    .fetch_optional(conn)
    .await
    .map_err(map_db_error)?;

    Ok(result.map(Chat::from))
}

/// Memberships and their messages go with the row
#[instrument(skip(conn))]
pub(crate) async fn delete(conn: &mut PgConnection, id: Uuid) -> RepoResult<()> {
    let result = sqlx::query("DELETE FROM chats WHERE id = $1")
        .bind(id)
        .execute(conn)
        .await
        .map_err(map_db_error)?;

    expect_affected(result.rows_affected(), "chat")
}
