//! Cart storage migration command.
//!
//! # Usage
//!
//! ```bash
//! rs-cli migrate
//! ```
//!
//! # Environment Variables
//!
//! - `CART_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//!
//! # Migration Files
//!
//! Migrations live in `crates/storefront/migrations/` and are embedded into
//! the storefront library at compile time.

use rocket_shoes_storefront::config::{ConfigError, StorefrontConfig};
use rocket_shoes_storefront::storage::{StorageError, create_pool, run_migrations};
use thiserror::Error;

/// Errors that can occur while migrating.
#[derive(Debug, Error)]
pub enum MigrationError {
    /// Database URL is missing.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Database connection error.
    #[error("Database connection error: {0}")]
    Database(#[from] sqlx::Error),

    /// Migration failed.
    #[error("{0}")]
    Storage(#[from] StorageError),
}

/// Run the cart storage migrations.
///
/// # Errors
///
/// Returns an error if the database URL is missing, the connection fails, or
/// a migration fails.
pub async fn run() -> Result<(), MigrationError> {
    let database_url = StorefrontConfig::database_url_from_env()?;

    tracing::info!("Connecting to cart database...");
    let pool = create_pool(&database_url).await?;

    tracing::info!("Running cart storage migrations...");
    run_migrations(&pool).await?;

    tracing::info!("Cart storage migrations complete!");
    Ok(())
}
