//! Storage factory for runtime storage selection

use std::path::PathBuf;
use std::sync::Arc;

use sqlx::postgres::PgPool;

use crate::config::{BlobSettings, StorageSettings};
use crate::domain::alias::AliasRow;
use crate::domain::blob::BlobStore;
use crate::domain::storage::{Storage, StorageRecord};
use crate::domain::{ComponentContext, DomainError};
use crate::infrastructure::alias::StoreAliasResolver;
use crate::infrastructure::blob::{InMemoryBlobStore, LocalBlobStore};

use super::in_memory::InMemoryStorage;
use super::postgres::{ensure_tables, PostgresConfig, PostgresStorage};

/// Supported storage types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageType {
    /// In-memory storage (for testing/development)
    InMemory,
    /// PostgreSQL storage
    Postgres,
}

impl StorageType {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "memory" | "inmemory" | "in-memory" | "in_memory" => Some(Self::InMemory),
            "postgres" | "postgresql" | "pg" => Some(Self::Postgres),
            _ => None,
        }
    }
}

/// Storage configuration
#[derive(Debug, Clone)]
pub enum StorageConfig {
    /// In-memory storage configuration
    InMemory,
    /// PostgreSQL storage configuration
    Postgres(PostgresConfig),
}

impl StorageConfig {
    /// Creates an in-memory storage configuration
    pub fn in_memory() -> Self {
        Self::InMemory
    }

    /// Builds the storage configuration from application settings
    pub fn from_settings(settings: &StorageSettings) -> Result<Self, DomainError> {
        let storage_type = StorageType::from_str(&settings.backend).ok_or_else(|| {
            DomainError::invalid_input(format!("Unknown storage backend '{}'", settings.backend))
        })?;

        match storage_type {
            StorageType::InMemory => Ok(Self::InMemory),
            StorageType::Postgres => {
                let url = settings
                    .database_url
                    .clone()
                    .filter(|url| !url.is_empty())
                    .ok_or_else(|| DomainError::unavailable("Database client not available"))?;

                Ok(Self::Postgres(
                    PostgresConfig::new(url)
                        .with_max_connections(settings.max_connections)
                        .with_min_connections(settings.min_connections)
                        .with_connect_timeout(settings.connect_timeout_secs),
                ))
            }
        }
    }

    /// Returns the storage type
    pub fn storage_type(&self) -> StorageType {
        match self {
            Self::InMemory => StorageType::InMemory,
            Self::Postgres(_) => StorageType::Postgres,
        }
    }
}

/// Factory for creating storage instances
#[derive(Debug)]
pub struct StorageFactory;

impl StorageFactory {
    /// Creates the component context for the configured backends
    pub fn create_context(
        config: &StorageConfig,
        blob: &BlobSettings,
    ) -> Result<ComponentContext, DomainError> {
        let blobs: Arc<dyn BlobStore> = match config {
            StorageConfig::InMemory => Arc::new(InMemoryBlobStore::new()),
            StorageConfig::Postgres(_) => Arc::new(LocalBlobStore::new(PathBuf::from(&blob.root))),
        };

        match config {
            StorageConfig::InMemory => Ok(Self::create_in_memory_context(blobs)),
            StorageConfig::Postgres(pg_config) => {
                let pool = pg_config.connect_lazy()?;
                Ok(Self::create_postgres_context(pool, blobs))
            }
        }
    }

    /// Creates a context backed entirely by in-memory tables
    pub fn create_in_memory_context(blobs: Arc<dyn BlobStore>) -> ComponentContext {
        ComponentContext {
            models: Self::create_in_memory(),
            versions: Self::create_in_memory(),
            directories: Self::create_in_memory(),
            annotations: Self::create_in_memory(),
            aliases: Arc::new(StoreAliasResolver::new(
                Self::create_in_memory::<AliasRow>(),
            )),
            blobs,
        }
    }

    /// Creates a context whose tables live in PostgreSQL
    pub fn create_postgres_context(pool: PgPool, blobs: Arc<dyn BlobStore>) -> ComponentContext {
        ComponentContext {
            models: Self::create_postgres(&pool),
            versions: Self::create_postgres(&pool),
            directories: Self::create_postgres(&pool),
            annotations: Self::create_postgres(&pool),
            aliases: Arc::new(StoreAliasResolver::new(Self::create_postgres::<AliasRow>(
                &pool,
            ))),
            blobs,
        }
    }

    /// Creates the tables of a PostgreSQL backend
    pub async fn migrate(config: &StorageConfig) -> Result<(), DomainError> {
        match config {
            StorageConfig::InMemory => Ok(()),
            StorageConfig::Postgres(pg_config) => ensure_tables(&pg_config.connect_lazy()?).await,
        }
    }

    /// Creates an in-memory table
    pub fn create_in_memory<R>() -> Arc<dyn Storage<R>>
    where
        R: StorageRecord,
    {
        Arc::new(InMemoryStorage::<R>::new())
    }

    /// Creates a PostgreSQL table on a shared pool
    pub fn create_postgres<R>(pool: &PgPool) -> Arc<dyn Storage<R>>
    where
        R: StorageRecord,
    {
        Arc::new(PostgresStorage::<R>::new(pool.clone()))
    }
}
