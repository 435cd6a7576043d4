//! Schema migrations for the PostgreSQL store.

use sqlx::PgPool;
use tracing::info;

use eolwatch_core::error::{AppError, ErrorKind};
use eolwatch_core::result::AppResult;

/// Apply every pending migration under `migrations/`.
pub async fn run_migrations(pool: &PgPool) -> AppResult<()> {
    let migrator = sqlx::migrate!("../../migrations");
    info!(available = migrator.iter().count(), "Applying store migrations");

    migrator.run(pool).await.map_err(|e| {
        AppError::with_source(
            ErrorKind::Database,
            format!("Failed to run migrations: {e}"),
            e,
        )
    })?;

    info!("Store migrations applied");
    Ok(())
}
