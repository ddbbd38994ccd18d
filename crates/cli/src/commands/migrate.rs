//! Database migration command.
//!
//! # Usage
//!
//! ```bash
//! dl-cli migrate
//! ```
//!
//! Uses the same configuration as the web application, so the default
//! target is `sqlite://donelist.db` unless `DATABASE_URL` is set.

use thiserror::Error;

use donelist_web::config::{AppConfig, ConfigError};
use donelist_web::db;

/// Errors that can occur while migrating.
#[derive(Debug, Error)]
pub enum MigrationError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Apply pending database migrations.
///
/// # Errors
///
/// Returns an error if the database cannot be reached or a migration
/// fails.
pub async fn run() -> Result<(), MigrationError> {
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env()?;

    tracing::info!("Connecting to database...");
    let pool = db::create_pool(&config.database_url).await?;

    tracing::info!("Running migrations...");
    db::MIGRATOR.run(&pool).await?;

    tracing::info!("Migrations complete!");
    Ok(())
}
