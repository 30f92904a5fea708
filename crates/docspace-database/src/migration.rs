//! Database migration runner.

use sqlx::PgPool;
use tracing::info;

use docspace_core::error::{AppError, ErrorKind};

/// Apply the bundled SQL migrations in `migrations/` that have not run yet.
pub async fn run_migrations(pool: &PgPool) -> Result<(), AppError> {
    info!("Running database migrations...");

    sqlx::migrate!("../../migrations")
        .run(pool)
        .await
        .map_err(|e| {
            AppError::with_source(
                ErrorKind::Internal,
                format!("Failed to run migrations: {e}"),
                e,
            )
        })?;

    info!("Database migrations completed successfully");
    Ok(())
}
