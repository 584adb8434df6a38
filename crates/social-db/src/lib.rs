//! # social-db
//!
//! Storage layer implementing the `social-core` repository traits.
//!
//! ## Overview
//!
//! Two backends are provided:
//!
//! - [`PgRepository`]: PostgreSQL via SQLx, with serializable transactions
//! - [`MemoryRepository`]: process memory, for tests and single-node runs
//!
//! ## Usage
//!
//! ```rust,ignore
//! use social_db::{create_pool, DatabaseConfig, PgRepository};
//! use social_core::traits::Repository;
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = DatabaseConfig::new("postgres://localhost/social");
//!     let repo = PgRepository::new(create_pool(&config).await?);
//!     repo.init_schema().await?;
//!
//!     let tx = repo.begin().await?;
//!     // ...
//!     tx.commit().await?;
//!     Ok(())
//! }
//! ```

pub mod mappers;
pub mod memory;
pub mod models;
pub mod pool;
pub mod repositories;

pub use memory::{MemoryRepository, MemoryTransaction};
pub use pool::{create_pool, DatabaseConfig, PgPool};
pub use repositories::{PgRepository, PgTransaction};
