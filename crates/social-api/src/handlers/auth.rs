//! Authentication handlers
//!
//! Endpoints for user registration, login and logout. The issued token is
//! returned in the body and also set as the `auth_token` cookie.

use axum::{extract::State, Json};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use social_core::forms::{UserLogin, UserRegistration};
use social_service::User;

use crate::dto::{AuthResponse, UserResponse};
use crate::extractors::{Session, ValidatedJson, AUTH_COOKIE};
use crate::response::{ApiResult, Created, NoContent};
use crate::state::AppState;

fn session_cookie(token: String) -> Cookie<'static> {
    Cookie::build((AUTH_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

pub(crate) fn clear_session(jar: CookieJar) -> CookieJar {
    jar.remove(Cookie::build(AUTH_COOKIE).path("/"))
}

fn authenticated(state: &AppState, user: &User<'_>, username: String) -> ApiResult<(String, AuthResponse)> {
    let token = state.app().users().issue_token(user)?;
    let response = AuthResponse::new(
        token.clone(),
        state.config().jwt.expiration_secs,
        UserResponse::new(user.id(), username),
    );
    Ok((token, response))
}

/// Register a new user
///
/// POST /auth/register
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    jar: CookieJar,
    ValidatedJson(form): ValidatedJson<UserRegistration>,
) -> ApiResult<(CookieJar, Created<Json<AuthResponse>>)> {
    let ctx = session.context(&state).await?;
    let username = form.username.clone();
    let user = state.app().users().register(&ctx, form).await?;

    let (token, response) = authenticated(&state, &user, username)?;
    Ok((jar.add(session_cookie(token)), Created(Json(response))))
}

/// Login with username and password
///
/// POST /auth/login
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    jar: CookieJar,
    ValidatedJson(form): ValidatedJson<UserLogin>,
) -> ApiResult<(CookieJar, Json<AuthResponse>)> {
    let ctx = session.context(&state).await?;
    let username = form.username.clone();
    let user = state.app().users().login(&ctx, form).await?;

    let (token, response) = authenticated(&state, &user, username)?;
    Ok((jar.add(session_cookie(token)), Json(response)))
}

/// Logout; tokens are stateless, so this only drops the cookie
///
/// POST /auth/logout
pub async fn logout(jar: CookieJar) -> (CookieJar, NoContent) {
    (clear_session(jar), NoContent)
}
