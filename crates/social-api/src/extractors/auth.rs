//! Session extractor
//!
//! Picks the bearer token out of the `Authorization` header, falling back to
//! the `auth_token` cookie. Verification happens later, when the handler
//! turns the session into a service `Context`.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::request::Parts,
};
use axum_extra::{
    extract::CookieJar,
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use social_service::Context;

use crate::response::{ApiError, ApiResult};
use crate::state::AppState;

/// Name of the cookie carrying the session token
pub const AUTH_COOKIE: &str = "auth_token";

/// Raw session credentials of one request
#[derive(Debug, Clone, Default)]
pub struct Session {
    token: Option<String>,
}

impl Session {
    pub fn new(token: Option<String>) -> Self {
        Self { token }
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Resolve the session into a deadline-bound service context
    pub async fn context<'a>(&self, state: &'a AppState) -> ApiResult<Context<'a>> {
        state.context(self.token()).await
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Session
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if let Ok(TypedHeader(Authorization(bearer))) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state).await
        {
            return Ok(Session::new(Some(bearer.token().to_string())));
        }

        let jar = CookieJar::from_headers(&parts.headers);
        let token = jar
            .get(AUTH_COOKIE)
            .map(|cookie| cookie.value().to_string())
            .filter(|value| !value.is_empty());

        Ok(Session::new(token))
    }
}
