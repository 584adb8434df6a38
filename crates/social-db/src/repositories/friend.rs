//! Friend request and friend connection queries

use sqlx::PgConnection;
use tracing::instrument;
use uuid::Uuid;

use social_core::entities::{FriendConnection, FriendRequest};
use social_core::traits::{Page, RepoResult};

use crate::models::FriendRequestModel;

use super::error::{expect_affected, map_db_error, map_write_error};

// ============================================================================
// Connections
// ============================================================================

#[instrument(skip(conn))]
pub(crate) async fn create_connection(
    conn: &mut PgConnection,
    user_id: Uuid,
    friend_id: Uuid,
) -> RepoResult<()> {
    let (first, second) = FriendConnection::new(user_id, friend_id).key();

    sqlx::query(
        r"
        INSERT INTO friend_connections (user1_id, user2_id)
        VALUES ($1, $2)
        ",
    )
    .bind(first)
    .bind(second)
    .execute(conn)
    .await
    .map_err(|e| map_write_error(e, "users are already friends", "user"))?;

    Ok(())
}

#[instrument(skip(conn))]
pub(crate) async fn delete_connection(
    conn: &mut PgConnection,
    user_id: Uuid,
    friend_id: Uuid,
) -> RepoResult<()> {
    let (first, second) = FriendConnection::new(user_id, friend_id).key();

    let result = sqlx::query(
        r"
        DELETE FROM friend_connections
        WHERE user1_id = $1 AND user2_id = $2
        ",
    )
    .bind(first)
    .bind(second)
    .execute(conn)
    .await
    .map_err(map_db_error)?;

    expect_affected(result.rows_affected(), "friend connection")
}

#[instrument(skip(conn))]
pub(crate) async fn connection_exists(
    conn: &mut PgConnection,
    user_id: Uuid,
    friend_id: Uuid,
) -> RepoResult<bool> {
    let (first, second) = FriendConnection::new(user_id, friend_id).key();

    sqlx::query_scalar::<_, bool>(
        r"
        SELECT EXISTS (
            SELECT 1 FROM friend_connections WHERE user1_id = $1 AND user2_id = $2
        )
        ",
    )
    .bind(first)
    .bind(second)
    .fetch_one(conn)
    .await
    .map_err(map_db_error)
}

#[instrument(skip(conn))]
pub(crate) async fn count_connections(conn: &mut PgConnection, user_id: Uuid) -> RepoResult<i64> {
    sqlx::query_scalar::<_, i64>(
        r"
        SELECT COUNT(*) FROM friend_connections
        WHERE user1_id = $1 OR user2_id = $1
        ",
    )
    .bind(user_id)
    .fetch_one(conn)
    .await
    .map_err(map_db_error)
}

// ============================================================================
// Requests
// ============================================================================

#[instrument(skip(conn, request), fields(request_id = %request.id))]
pub(crate) async fn create_request(
    conn: &mut PgConnection,
    request: &FriendRequest,
) -> RepoResult<()> {
    sqlx::query(
        r"
        INSERT INTO friend_requests (id, from_id, to_id, created_at)
        VALUES ($1, $2, $3, $4)
        ",
    )
    .bind(request.id)
    .bind(request.from_id)
    .bind(request.to_id)
    .bind(request.created_at)
    .execute(conn)
    .await
    .map_err(|e| map_write_error(e, "friend request already exists", "user"))?;

    Ok(())
}

#[instrument(skip(conn))]
pub(crate) async fn find_request(
    conn: &mut PgConnection,
    id: Uuid,
) -> RepoResult<Option<FriendRequest>> {
    let result = sqlx::query_as::<_, FriendRequestModel>(
        r"
        SELECT id, from_id, to_id, created_at
        FROM friend_requests
        WHERE id = $1
        ",
    )
    .bind(id)
    .fetch_optional(conn)
    .await
    .map_err(map_db_error)?;

    Ok(result.map(FriendRequest::from))
}

#[instrument(skip(conn))]
pub(crate) async fn find_request_between(
    conn: &mut PgConnection,
    from_id: Uuid,
    to_id: Uuid,
) -> RepoResult<Option<FriendRequest>> {
    let result = sqlx::query_as::<_, FriendRequestModel>(
        r"
        SELECT id, from_id, to_id, created_at
        FROM friend_requests
        WHERE from_id = $1 AND to_id = $2
        ",
    )
    .bind(from_id)
    .bind(to_id)
    .fetch_optional(conn)
    .await
    .map_err(map_db_error)?;

    Ok(result.map(FriendRequest::from))
}

#[instrument(skip(conn))]
pub(crate) async fn delete_request(conn: &mut PgConnection, id: Uuid) -> RepoResult<()> {
    let result = sqlx::query("DELETE FROM friend_requests WHERE id = $1")
        .bind(id)
        .execute(conn)
        .await
        .map_err(map_db_error)?;

    expect_affected(result.rows_affected(), "friend request")
}

#[instrument(skip(conn))]
pub(crate) async fn find_incoming(
    conn: &mut PgConnection,
    user_id: Uuid,
    page: Page,
) -> RepoResult<Vec<FriendRequest>> {
    let results = sqlx::query_as::<_, FriendRequestModel>(
        r"
        SELECT id, from_id, to_id, created_at
        FROM friend_requests
        WHERE to_id = $1
        ORDER BY created_at, id
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

    Ok(results.into_iter().map(FriendRequest::from).collect())
}

#[instrument(skip(conn))]
pub(crate) async fn find_outgoing(
    conn: &mut PgConnection,
    user_id: Uuid,
    page: Page,
) -> RepoResult<Vec<FriendRequest>> {
    let results = sqlx::query_as::<_, FriendRequestModel>(
        r"
        SELECT id, from_id, to_id, created_at
        FROM friend_requests
        WHERE from_id = $1
        ORDER BY created_at, id
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

    Ok(results.into_iter().map(FriendRequest::from).collect())
}

#[instrument(skip(conn))]
pub(crate) async fn count_incoming(conn: &mut PgConnection, user_id: Uuid) -> RepoResult<i64> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM friend_requests WHERE to_id = $1")
        .bind(user_id)
        .fetch_one(conn)
        .await
        .map_err(map_db_error)
}

#[instrument(skip(conn))]
pub(crate) async fn count_outgoing(conn: &mut PgConnection, user_id: Uuid) -> RepoResult<i64> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM friend_requests WHERE from_id = $1")
        .bind(user_id)
        .fetch_one(conn)
        .await
        .map_err(map_db_error)
}
