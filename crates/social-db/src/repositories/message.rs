//! Message queries

use sqlx::PgConnection;
use tracing::instrument;
use uuid::Uuid;

use social_core::entities::Message;
use social_core::traits::{Page, RepoResult};

use crate::models::MessageModel;

use super::error::{expect_affected, map_db_error, map_write_error};

#[instrument(skip(conn, message), fields(message_id = %message.id, chat_id = %message.chat_id))]
pub(crate) async fn create(conn: &mut PgConnection, message: &Message) -> RepoResult<()> {
    sqlx::query(
        r"
        INSERT INTO messages (id, chat_id, user_id, payload, created_at, last_update)
        VALUES ($1, $2, $3, $4, $5, $6)
        ",
    )
    .bind(message.id)
    .bind(message.chat_id)
    .bind(message.user_id)
    .bind(&message.payload)
    .bind(message.created_at)
    .bind(message.last_update)
    .execute(conn)
    .await
    .map_err(|e| map_write_error(e, "message already exists", "chat member"))?;

    Ok(())
}

#[instrument(skip(conn))]
pub(crate) async fn find_by_id(conn: &mut PgConnection, id: Uuid) -> RepoResult<Option<Message>> {
    let result = sqlx::query_as::<_, MessageModel>(
        r"
        SELECT id, chat_id, user_id, payload, created_at, last_update
        FROM messages
        WHERE id = $1
        ",
    )
    .bind(id)
    .fetch_optional(conn)
    .await
    .map_err(map_db_error)?;

    Ok(result.map(Message::from))
}

#[instrument(skip(conn, message), fields(message_id = %message.id))]
pub(crate) async fn update(conn: &mut PgConnection, message: &Message) -> RepoResult<()> {
    let result = sqlx::query(
        r"
        UPDATE messages
        SET payload = $2, last_update = $3
        WHERE id = $1
        ",
    )
    .bind(message.id)
    .bind(&message.payload)
    .bind(message.last_update)
    .execute(conn)
    .await
    .map_err(map_db_error)?;

    expect_affected(result.rows_affected(), "message")
}

#[instrument(skip(conn))]
pub(crate) async fn delete(conn: &mut PgConnection, id: Uuid) -> RepoResult<()> {
    let result = sqlx::query("DELETE FROM messages WHERE id = $1")
        .bind(id)
        .execute(conn)
        .await
        .map_err(map_db_error)?;

    expect_affected(result.rows_affected(), "message")
}

/// Newest first; ties on the timestamp are broken by id so pages are stable
#[instrument(skip(conn))]
pub(crate) async fn find_by_chat(
    conn: &mut PgConnection,
    chat_id: Uuid,
    page: Page,
) -> RepoResult<Vec<Message>> {
    let results = sqlx::query_as::<_, MessageModel>(
        r"
        SELECT id, chat_id, user_id, payload, created_at, last_update
        FROM messages
        WHERE chat_id = $1
        ORDER BY created_at DESC, id DESC
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

    Ok(results.into_iter().map(Message::from).collect())
}

#[instrument(skip(conn))]
pub(crate) async fn count_by_chat(conn: &mut PgConnection, chat_id: Uuid) -> RepoResult<i64> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM messages WHERE chat_id = $1")
        .bind(chat_id)
        .fetch_one(conn)
        .await
        .map_err(map_db_error)
}
