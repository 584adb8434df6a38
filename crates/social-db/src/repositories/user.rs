//! User queries

use sqlx::PgConnection;
use tracing::instrument;
use uuid::Uuid;

use social_core::entities::User;
use social_core::traits::{Page, RepoResult};

use crate::models::UserModel;

use super::error::{expect_affected, map_db_error, map_write_error};

#[instrument(skip(conn, user), fields(user_id = %user.id))]
pub(crate) async fn create(conn: &mut PgConnection, user: &User) -> RepoResult<()> {
    sqlx::query(
        r"
        INSERT INTO users (id, username, password_hash)
        VALUES ($1, $2, $3)
        ",
    )
    .bind(user.id)
    .bind(&user.username)
    .bind(&user.password_hash)
    .execute(conn)
    .await
    .map_err(|e| map_write_error(e, "username is already taken", "user"))?;

    Ok(())
}

#[instrument(skip(conn))]
pub(crate) async fn find_by_id(conn: &mut PgConnection, id: Uuid) -> RepoResult<Option<User>> {
    let result = sqlx::query_as::<_, UserModel>(
        r"
        SELECT id, username, password_hash
        FROM users
        WHERE id = $1
        ",
    )
    .bind(id)
    .fetch_optional(conn)
    .await
    .map_err(map_db_error)?;

    Ok(result.map(User::from))
}

#[instrument(skip(conn))]
pub(crate) async fn find_by_username(
    conn: &mut PgConnection,
    username: &str,
) -> RepoResult<Option<User>> {
    let result = sqlx::query_as::<_, UserModel>(
        r"
        SELECT id, username, password_hash
        FROM users
        WHERE username = $1
        ",
    )
    .bind(username)
    .fetch_optional(conn)
    .await
    .map_err(map_db_error)?;

    Ok(result.map(User::from))
}

#[instrument(skip(conn, user), fields(user_id = %user.id))]
pub(crate) async fn update(conn: &mut PgConnection, user: &User) -> RepoResult<()> {
    let result = sqlx::query(
        r"
        UPDATE users
        SET username = $2, password_hash = $3
        WHERE id = $1
        ",
    )
    .bind(user.id)
    .bind(&user.username)
    .bind(&user.password_hash)
    .execute(conn)
    .await
    .map_err(|e| map_write_error(e, "username is already taken", "user"))?;

    expect_affected(result.rows_affected(), "user")
}

/// Memberships, owned chats, requests and connections go with the row
#[instrument(skip(conn))]
pub(crate) async fn delete(conn: &mut PgConnection, id: Uuid) -> RepoResult<()> {
    let result = sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(id)
        .execute(conn)
        .await
        .map_err(map_db_error)?;

    expect_affected(result.rows_affected(), "user")
}

#[instrument(skip(conn))]
pub(crate) async fn find_friends(
    conn: &mut PgConnection,
    user_id: Uuid,
    page: Page,
) -> RepoResult<Vec<User>> {
    let results = sqlx::query_as::<_, UserModel>(
        r"
        SELECT u.id, u.username, u.password_hash
        FROM users u
        JOIN friend_connections f
          ON (f.user1_id = $1 AND u.id = f.user2_id)
          OR (f.user2_id = $1 AND u.id = f.user1_id)
        ORDER BY u.id
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

    Ok(results.into_iter().map(User::from).collect())
}
