//! Key-value persistence for the cart.
//!
//! The cart is stored as a single JSON document under [`CART_STORAGE_KEY`]
//! and replaced wholesale on every successful mutation.
//!
//! # Backends
//!
//! - [`MemoryStorage`] - in-process map, lost on restart
//! - [`FileStorage`] - one JSON file per key in a directory
//! - [`PgStorage`] - `cart_storage` table in `PostgreSQL`
//!
//! [`StorageBackend`] selects one of them from configuration.
//!
//! # Migrations
//!
//! The `PostgreSQL` table is created by migrations in
//! `crates/storefront/migrations/`, run via:
//! ```bash
//! cargo run -p rocket-shoes-cli -- migrate
//! ```

mod file;
mod memory;
mod postgres;

use std::future::Future;

use thiserror::Error;

use crate::config::StorageConfig;

pub use file::FileStorage;
pub use memory::MemoryStorage;
pub use postgres::{PgStorage, create_pool, run_migrations};

/// Storage key holding the serialized cart.
pub const CART_STORAGE_KEY: &str = "@RocketShoes:cart";

/// Errors from storage backends.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Database query failed.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Migration failed.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Stored value could not be encoded or decoded.
    #[error("Corrupt stored value: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// String key-value store.
///
/// `set` must replace the whole value or leave the previous one in place;
/// readers never observe a partial write.
pub trait CartStorage: Send + Sync {
    /// Read the value stored under `key`.
    fn get(&self, key: &str) -> impl Future<Output = Result<Option<String>, StorageError>> + Send;

    /// Replace the value stored under `key`.
    fn set(&self, key: &str, value: &str) -> impl Future<Output = Result<(), StorageError>> + Send;
}

/// Storage selected at startup.
#[derive(Debug, Clone)]
pub enum StorageBackend {
    Memory(MemoryStorage),
    File(FileStorage),
    Postgres(PgStorage),
}

impl StorageBackend {
    /// Open the backend described by `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database pool cannot be created.
    pub async fn connect(config: &StorageConfig) -> Result<Self, StorageError> {
        let backend = match config {
            StorageConfig::Memory => Self::Memory(MemoryStorage::new()),
            StorageConfig::File { dir } => Self::File(FileStorage::new(dir)),
            StorageConfig::Postgres { database_url } => {
                Self::Postgres(PgStorage::new(create_pool(database_url).await?))
            }
        };
        tracing::info!(backend = backend.name(), "Cart storage ready");
        Ok(backend)
    }

    /// Short backend name for logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Memory(_) => "memory",
            Self::File(_) => "file",
            Self::Postgres(_) => "postgres",
        }
    }
}

impl CartStorage for StorageBackend {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match self {
            Self::Memory(storage) => storage.get(key).await,
            Self::File(storage) => storage.get(key).await,
            Self::Postgres(storage) => storage.get(key).await,
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        match self {
            Self::Memory(storage) => storage.set(key, value).await,
            Self::File(storage) => storage.set(key, value).await,
            Self::Postgres(storage) => storage.set(key, value).await,
        }
    }
}
