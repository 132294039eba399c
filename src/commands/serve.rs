//! Serve command - Starts the HTTP server.

use std::sync::Arc;

use crate::api::{create_router, AppState};
use crate::cli::args::ServeArgs;
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::infra::{Cache, Database, SupabaseStorage};
use crate::jobs::MailgunNotifier;

/// Execute the serve command
pub async fn execute(args: ServeArgs, config: Config) -> AppResult<()> {
    // Infrastructure first: a server without its database or Redis is
    // useless, so both failures abort startup
    let db = Arc::new(Database::connect(&config).await);
    let cache = Arc::new(Cache::connect(&config).await);

    // Outbound gateways degrade gracefully and are wired unconditionally
    let storage = Arc::new(SupabaseStorage::new(&config));
    let notifier = Arc::new(MailgunNotifier::new(&config));

    let app_state = AppState::from_config(db, cache, storage, notifier, config);
    let app = create_router(app_state);

    let addr = format!("{}:{}", args.host, args.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind to {}: {}", addr, e)))?;

    tracing::info!("Listening on http://{}", addr);

    axum::serve(listener, app)
        .await
        .map_err(|e| AppError::internal(format!("Server error: {}", e)))
}
