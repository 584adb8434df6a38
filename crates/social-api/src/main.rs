//! Social API Server entry point
//!
//! Run with:
//! ```bash
//! cargo run -p social-api [config-file]
//! ```
//!
//! Configuration is loaded from the file given as the first argument, or
//! from environment variables (and `.env`) when none is given.

use social_common::{try_init_tracing, AppConfig, TracingConfig};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let config = match std::env::args().nth(1) {
        Some(path) => AppConfig::from_file(&path),
        None => AppConfig::from_env(),
    };

    // Tracing depends on the environment, so configuration errors go to stderr
    let config = match config {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = try_init_tracing(&TracingConfig::for_environment(config.app.env)) {
        eprintln!("Warning: Failed to initialize tracing: {e}");
    }

    info!(
        env = ?config.app.env,
        address = %config.api.address(),
        storage = ?config.storage.backend,
        "Starting Social API Server"
    );

    if let Err(e) = social_api::run(config).await {
        error!(error = %e, "Server failed");
        std::process::exit(1);
    }
}
