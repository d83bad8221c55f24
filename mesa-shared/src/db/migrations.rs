/// Database migration runner
///
/// Migrations live in the `migrations/` directory of this crate and are
/// applied with sqlx's embedded migrator. The schema is one document
/// table per collection (`id`, `doc` JSONB, `created_at`, `updated_at`)
/// with a GIN index on `doc`. No foreign keys are declared: referential
/// checks happen at write time in the handlers, not in the store.
///
/// # Example
///
/// ```no_run
/// use mesa_shared::db::migrations::run_migrations;
/// use mesa_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
/// run_migrations(&pool).await?;
/// # Ok(())
/// # }
/// ```
use sqlx::postgres::PgPool;
use tracing::{info, warn};

/// Runs all pending database migrations
///
/// # Errors
///
/// Returns an error if a migration file is malformed or fails to execute.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    info!("Starting database migrations");

    let migrations = sqlx::migrate!("./migrations");

    match migrations.run(pool).await {
        Ok(()) => {
            info!("All database migrations completed successfully");
            Ok(())
        }
        Err(e) => {
            warn!("Migration failed: {}", e);
            Err(e)
        }
    }
}
