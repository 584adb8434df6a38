//! # social-service
//!
//! Application layer: the [`App`] root, the request [`Context`], the entity
//! facades and the managers. Every read and mutation of the social graph and
//! of chats goes through here.

pub mod services;

pub use services::{
    App, AppBuilder, Chat, ChatManager, ChatMember, Context, FriendConnection, FriendRequest,
    Message, ServiceError, ServiceResult, User, UserManager,
};
