//! Serve command - Starts the HTTP server.

use std::sync::Arc;

use tokio::time::Duration;

use crate::api::{create_router, AppState};
use crate::cli::args::ServeArgs;
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::infra::{Cache, Database};
use crate::services::Services;

/// Execute the serve command
pub async fn execute(args: ServeArgs, config: Config) -> AppResult<()> {
    tracing::info!("Starting server...");

    let (services, app_state) = if args.in_memory {
        tracing::warn!("Using in-memory backends, all state is lost on exit");
        let services = Services::in_memory(&config)?;
        let state = AppState::from_services(&services, &config);
        (services, state)
    } else {
        let db = Arc::new(Database::connect(&config.database_url).await?);
        let cache = Arc::new(Cache::connect(&config.redis_url).await?);

        let services = Services::postgres(&db, &cache, &config)?;
        let state = AppState::from_services(&services, &config).with_backends(db, cache);
        (services, state)
    };

    let pruner = services.spawn_revocation_pruner(Duration::from_secs(
        config.revocation_prune_interval_secs.max(1),
    ));

    let app = create_router(app_state);

    let addr = format!("{}:{}", args.host, args.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind to {}: {}", addr, e)))?;

    tracing::info!("Server running on http://{}", addr);

    let result = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::internal(format!("Server error: {}", e)));

    pruner.abort();
    tracing::info!("Server stopped");

    result
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Received shutdown signal, stopping server...");
}
