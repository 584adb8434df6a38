//! Database models with SQLx `FromRow` derives

mod chat;
mod friend_request;
mod member;
mod message;
mod user;

pub use chat::ChatModel;
pub use friend_request::FriendRequestModel;
pub use member::ChatMemberModel;
pub use message::MessageModel;
pub use user::UserModel;
