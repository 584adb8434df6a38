//! # social-api
//!
//! REST API server built with Axum framework, plus a server-sent event feed
//! of domain events.

pub mod dto;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod routes;
pub mod server;
pub mod state;

pub use server::{create_app, create_app_state, run, run_server};
pub use state::AppState;
