//! Domain facades and managers
//!
//! Facades are cheap `Copy` handles holding a reference to the [`App`] and
//! the id of one entity. They keep no field values: every accessor reloads
//! the row and re-checks the caller's relation to it.

pub mod app;
pub mod chat;
pub mod chat_manager;
pub mod context;
pub mod error;
pub mod friend_connection;
pub mod friend_request;
pub mod member;
pub mod message;
pub mod user;
pub mod user_manager;

#[cfg(test)]
pub(crate) mod testing;

pub use app::{App, AppBuilder};
pub use chat::Chat;
pub use chat_manager::ChatManager;
pub use context::Context;
pub use error::{ServiceError, ServiceResult};
pub use friend_connection::FriendConnection;
pub use friend_request::FriendRequest;
pub use member::ChatMember;
pub use message::Message;
pub use user::User;
pub use user_manager::UserManager;
