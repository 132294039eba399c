//! Migrate command - Database schema management.

use crate::cli::args::{MigrateAction, MigrateArgs};
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::infra::Database;

/// Execute the migrate command
pub async fn execute(args: MigrateArgs, config: Config) -> AppResult<()> {
    // Schema changes are explicit here, never automatic
    let db = Database::connect_without_migrations(&config)
        .await
        .map_err(|e| AppError::internal(format!("Database connection failed: {}", e)))?;

    match args.action {
        MigrateAction::Up => {
            db.run_migrations()
                .await
                .map_err(|e| AppError::internal(e.to_string()))?;
            tracing::info!("Schema is up to date");
        }
        MigrateAction::Down => {
            db.rollback_migration()
                .await
                .map_err(|e| AppError::internal(e.to_string()))?;
            tracing::info!("Rolled back one migration");
        }
        MigrateAction::Status => {
            let statuses = db
                .migration_status()
                .await
                .map_err(|e| AppError::internal(e.to_string()))?;
            for status in statuses {
                println!(
                    "{:<55} {}",
                    status.name,
                    if status.applied { "applied" } else { "pending" }
                );
            }
        }
        MigrateAction::Fresh { yes } => {
            if !yes {
                return Err(AppError::bad_request(
                    "`migrate fresh` destroys all data; pass --yes to confirm",
                ));
            }
            tracing::warn!("Dropping all tables and re-running every migration");
            db.reset()
                .await
                .map_err(|e| AppError::internal(e.to_string()))?;
            tracing::info!("Database reset complete");
        }
    }

    Ok(())
}
