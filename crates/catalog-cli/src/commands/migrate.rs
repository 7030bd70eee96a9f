//! Database migration command.

use catalog_core::config::AppConfig;
use catalog_core::error::AppError;
use catalog_database::DatabasePool;
use catalog_database::migration::run_migrations;

use crate::output;

/// Apply all pending migrations
pub async fn execute(config: &AppConfig, ephemeral: bool) -> Result<(), AppError> {
    if ephemeral {
        output::print_success("In-memory catalog needs no migrations.");
        return Ok(());
    }

    let pool = DatabasePool::connect(&config.database).await?;
    println!("Running database migrations...");
    let result = run_migrations(pool.pool()).await;
    pool.close().await;
    result?;

    output::print_success("All migrations applied successfully.");
    Ok(())
}
