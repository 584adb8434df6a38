//! Repository implementations
//!
//! The PostgreSQL queries live in one module per entity; `postgres` wires
//! them into the `Store`, `Repository` and `Transaction` traits.

mod chat;
mod error;
mod friend;
mod member;
mod message;
mod postgres;
mod user;

pub use error::{expect_affected, map_db_error, map_write_error};
pub use postgres::{PgRepository, PgTransaction};
