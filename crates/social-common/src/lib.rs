//! # social-common
//!
//! Shared utilities including configuration, error handling, identity tokens, and telemetry.

pub mod auth;
pub mod config;
pub mod error;
pub mod telemetry;

// Re-export commonly used types at crate root
pub use auth::{hash_password, verify_password, Authorizer, Claims, JwtAuthorizer};
pub use config::{
    AppConfig, AppSettings, ConfigError, CorsConfig, Environment, EventsConfig, JwtConfig,
    RateLimitConfig, ServerConfig, StorageBackend, StorageConfig,
};
pub use error::{domain_status_code, AppError, AppResult, ErrorResponse};
pub use telemetry::{init_tracing, try_init_tracing, TracingConfig, TracingError};
