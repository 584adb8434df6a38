//! Integration test utilities for the social server
//!
//! This crate provides helpers for running end-to-end tests against
//! the REST API and its event feed.

pub mod fixtures;
pub mod helpers;

pub use fixtures::*;
pub use helpers::*;
