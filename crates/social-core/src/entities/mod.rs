//! Domain entities - core business objects

mod chat;
mod friend_connection;
mod friend_request;
mod member;
mod message;
mod user;

pub use chat::Chat;
pub use friend_connection::FriendConnection;
pub use friend_request::FriendRequest;
pub use member::{ChatMember, MemberStatus};
pub use message::Message;
pub use user::User;
