//! Server setup and initialization
//!
//! Provides the main application builder and server runner.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use social_common::{AppConfig, AppError, JwtAuthorizer, StorageBackend};
use social_core::Repository;
use social_db::{create_pool, DatabaseConfig, MemoryRepository, PgRepository};
use social_events::LocalEventBus;
use social_service::App;
use tokio::net::TcpListener;
use tracing::info;

use crate::middleware::{apply_middleware, rate_limited};
use crate::routes::{auth_routes, create_router, health_routes};
use crate::state::AppState;

/// Build the complete Axum application with all routes and middleware
pub fn create_app(state: AppState) -> Result<Router, AppError> {
    let auth = rate_limited(auth_routes(), &state.config().rate_limit)?;
    let router = create_router(auth).merge(health_routes());
    let router = apply_middleware(router, state.config());
    Ok(router.with_state(state))
}

async fn create_repository(config: &AppConfig) -> Result<Arc<dyn Repository>, AppError> {
    match config.storage.backend {
        StorageBackend::Memory => {
            info!("Using in-memory storage");
            Ok(Arc::new(MemoryRepository::new()))
        }
        StorageBackend::Postgres => {
            let db_config = DatabaseConfig::from_storage(&config.storage)
                .ok_or_else(|| AppError::Config("DATABASE_URL is required".to_string()))?;

            info!("Connecting to PostgreSQL...");
            let pool = create_pool(&db_config).await.map_err(AppError::internal)?;
            let repo = PgRepository::new(pool);
            repo.init_schema().await?;
            info!("PostgreSQL connection established");

            Ok(Arc::new(repo))
        }
    }
}

/// Initialize all dependencies and create AppState
pub async fn create_app_state(config: AppConfig) -> Result<AppState, AppError> {
    let repo = create_repository(&config).await?;
    let authorizer = Arc::new(JwtAuthorizer::new(
        &config.jwt.secret,
        config.jwt.expiration_secs,
    ));
    let bus = Arc::new(LocalEventBus::new(config.events.queue_capacity));

    let app = App::builder()
        .repo(repo)
        .authorizer(authorizer)
        .events(bus)
        .build()?;

    Ok(AppState::new(app, config))
}

/// Run the HTTP server
pub async fn run_server(app: Router, addr: SocketAddr) -> Result<(), AppError> {
    info!("Starting HTTP server on {}", addr);

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::Config(format!("Failed to bind to {addr}: {e}")))?;

    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::Config(format!("Server error: {e}")))?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

/// Run the complete server with configuration
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let addr: SocketAddr = config
        .api
        .address()
        .parse()
        .map_err(|e| AppError::Config(format!("Invalid listen address: {e}")))?;

    let state = create_app_state(config).await?;
    let app = create_app(state)?;

    run_server(app, addr).await
}
