//! Path parameter extractors
//!
//! Ids are UUIDs; a malformed id is rejected with `INVALID_PATH_PARAMETER`
//! instead of axum's plain-text rejection.

use axum::{
    async_trait,
    extract::{FromRequestParts, Path},
    http::request::Parts,
};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use uuid::Uuid;

use crate::response::ApiError;

/// Path parameters decoded into `T`
#[derive(Debug, Clone)]
pub struct IdPath<T>(pub T);

#[async_trait]
impl<S, T> FromRequestParts<S> for IdPath<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Send,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(inner) = Path::<T>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::invalid_path(e.to_string()))?;

        Ok(IdPath(inner))
    }
}

/// `/chats/:chat_id/members/:user_id`
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ChatMemberPath {
    pub chat_id: Uuid,
    pub user_id: Uuid,
}
