//! Backend selection and collection wiring

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use sqlx::postgres::PgPool;
use thiserror::Error;
use tracing::info;

use crate::domain::storage::{Storage, StorageEntity};
use crate::domain::StorageError;

use super::in_memory::InMemoryStorage;
use super::postgres::{PostgresConfig, PostgresStorage};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageType {
    InMemory,
    Postgres,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown storage backend '{0}'")]
pub struct UnknownBackend(pub String);

impl FromStr for StorageType {
    type Err = UnknownBackend;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace(['-', '_'], "").as_str() {
            "memory" | "inmemory" => Ok(Self::InMemory),
            "postgres" | "postgresql" | "pg" => Ok(Self::Postgres),
            _ => Err(UnknownBackend(s.to_string())),
        }
    }
}

impl fmt::Display for StorageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::InMemory => "memory",
            Self::Postgres => "postgres",
        })
    }
}

/// Resolved backend settings
#[derive(Debug, Clone)]
pub enum StorageConfig {
    InMemory,
    Postgres(PostgresConfig),
}

impl StorageConfig {
    pub fn in_memory() -> Self {
        Self::InMemory
    }

    pub fn postgres(config: PostgresConfig) -> Self {
        Self::Postgres(config)
    }

    pub fn storage_type(&self) -> StorageType {
        match self {
            Self::InMemory => StorageType::InMemory,
            Self::Postgres(_) => StorageType::Postgres,
        }
    }

    /// Connect to the backend. Collections opened from the result share its pool.
    pub async fn open(&self) -> Result<StorageBackend, StorageError> {
        match self {
            Self::InMemory => Ok(StorageBackend::InMemory),
            Self::Postgres(pg) => {
                info!(max_connections = pg.max_connections, "Connecting to PostgreSQL...");
                let pool = pg.connect().await?;
                info!("PostgreSQL connection established");
                Ok(StorageBackend::Postgres(pool))
            }
        }
    }
}

/// A connected backend
#[derive(Debug, Clone)]
pub enum StorageBackend {
    InMemory,
    Postgres(PgPool),
}

impl StorageBackend {
    /// Open a named collection, creating its table when the backend needs one
    pub async fn collection<E>(&self, name: &str) -> Result<Arc<dyn Storage<E>>, StorageError>
    where
        E: StorageEntity + 'static,
    {
        match self {
            Self::InMemory => Ok(Arc::new(InMemoryStorage::<E>::new())),
            Self::Postgres(pool) => {
                let storage = PostgresStorage::<E>::new(pool.clone(), name)?;
                storage.ensure_table().await?;
                Ok(Arc::new(storage))
            }
        }
    }
}
