//! Configuration structs

mod app_config;

pub use app_config::{
    AppConfig, AppSettings, ConfigError, CorsConfig, Environment, EventsConfig, JwtConfig,
    RateLimitConfig, ServerConfig, StorageBackend, StorageConfig,
};
