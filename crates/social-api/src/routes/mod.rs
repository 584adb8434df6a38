//! Route definitions
//!
//! All API routes organized by domain and mounted under /api/v1.

use axum::{
    routing::{delete, get, post},
    Router,
};

use crate::handlers::{auth, chats, events, friends, health, messages, users};
use crate::state::AppState;

/// API routes; the authentication routes are kept apart so the rate limiter
/// can wrap them alone
pub fn create_router(auth: Router<AppState>) -> Router<AppState> {
    Router::new().nest("/api/v1", api_v1_routes().merge(auth))
}

/// Health check routes
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
}

/// Authentication routes
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
}

fn api_v1_routes() -> Router<AppState> {
    Router::new()
        .merge(user_routes())
        .merge(friend_routes())
        .merge(chat_routes())
        .merge(message_routes())
        .route("/events", get(events::event_feed))
}

/// User routes
fn user_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/users/@me",
            get(users::get_current_user)
                .patch(users::update_current_user)
                .delete(users::delete_current_user),
        )
        .route("/users/@me/chats", get(users::get_current_user_chats))
        .route("/users/:user_id", get(users::get_user))
}

/// Friend and friend request routes
fn friend_routes() -> Router<AppState> {
    Router::new()
        .route("/users/@me/friends", get(friends::get_friends))
        .route(
            "/users/@me/friends/:user_id",
            delete(friends::remove_friend),
        )
        .route(
            "/users/@me/friend-requests",
            post(friends::send_friend_request),
        )
        .route(
            "/users/@me/friend-requests/incoming",
            get(friends::get_incoming_requests),
        )
        .route(
            "/users/@me/friend-requests/outgoing",
            get(friends::get_outgoing_requests),
        )
        .route(
            "/friend-requests/:request_id",
            delete(friends::withdraw_friend_request),
        )
        .route(
            "/friend-requests/:request_id/accept",
            post(friends::accept_friend_request),
        )
        .route(
            "/friend-requests/:request_id/decline",
            post(friends::decline_friend_request),
        )
}

/// Chat routes
fn chat_routes() -> Router<AppState> {
    Router::new()
        .route("/chats", post(chats::create_chat))
        .route("/chats/:chat_id", get(chats::get_chat).delete(chats::delete_chat))
        .route(
            "/chats/:chat_id/members",
            get(chats::get_members).post(chats::add_member),
        )
        .route(
            "/chats/:chat_id/members/:user_id",
            delete(chats::remove_member),
        )
        .route(
            "/chats/:chat_id/messages",
            get(chats::get_messages).post(chats::send_message),
        )
}

/// Message routes
fn message_routes() -> Router<AppState> {
    Router::new().route(
        "/messages/:message_id",
        get(messages::get_message)
            .patch(messages::update_message)
            .delete(messages::delete_message),
    )
}
