//! Axum extractors for request handling
//!
//! Custom extractors for the session token, validation, pagination and
//! path parameters.

mod auth;
mod pagination;
mod path;
mod validated;

pub use auth::{Session, AUTH_COOKIE};
pub use pagination::{Pagination, PaginationParams};
pub use path::{ChatMemberPath, IdPath};
pub use validated::ValidatedJson;
