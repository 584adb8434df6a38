//! Request and response bodies of the HTTP API
//!
//! Forms that the service layer validates itself (`UserRegistration`,
//! `ChatCreation`, ...) are decoded directly; this module only adds the
//! bodies that exist at the HTTP boundary.

mod requests;
mod responses;

pub use requests::{AddMemberRequest, FriendRequestCreate};
pub use responses::{
    AuthResponse, ChatResponse, FriendRequestResponse, HealthResponse, ListResponse,
    MemberResponse, MessageResponse, ReadinessResponse, UserResponse,
};
