//! Application state
//!
//! Holds the shared state for the Axum application: the service `App` and
//! the configuration.

use std::sync::Arc;
use std::time::Duration;

use social_common::AppConfig;
use social_service::{App, Context};

use crate::response::ApiResult;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    app: Arc<App>,
    config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(app: App, config: AppConfig) -> Self {
        Self {
            app: Arc::new(app),
            config: Arc::new(config),
        }
    }

    /// The service root every facade borrows
    pub fn app(&self) -> &App {
        &self.app
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Deadline budget for one request
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.config.api.request_timeout_secs)
    }

    /// Build the request context for an optional bearer token
    ///
    /// A missing, invalid or stale token gives an anonymous context.
    pub async fn context(&self, token: Option<&str>) -> ApiResult<Context<'_>> {
        let ctx = match token {
            Some(token) => self.app.context_for_token(token).await?,
            None => Context::anonymous(),
        };
        Ok(ctx.with_timeout(self.request_timeout()))
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("app", &self.app)
            .field("config", &"AppConfig")
            .finish()
    }
}
