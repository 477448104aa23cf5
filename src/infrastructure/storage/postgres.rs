//! PostgreSQL JSONB document storage

use std::fmt::Debug;
use std::marker::PhantomData;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::Row;

use crate::domain::storage::{Storage, StorageEntity, StorageKey};
use crate::domain::StorageError;

/// Pool settings for the PostgreSQL backend
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    /// Bound on acquiring a connection, also used for the initial connect
    pub connect_timeout_secs: u64,
    pub idle_timeout_secs: u64,
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            url: "postgres://localhost/employee_registry".to_string(),
            max_connections: 10,
            min_connections: 1,
            connect_timeout_secs: 10,
            idle_timeout_secs: 600,
        }
    }
}

impl PostgresConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    pub fn with_max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    pub fn with_connect_timeout(mut self, secs: u64) -> Self {
        self.connect_timeout_secs = secs;
        self
    }

    /// Open the pool. Any failure here means the database is unreachable.
    pub async fn connect(&self) -> Result<PgPool, StorageError> {
        PgPoolOptions::new()
            .max_connections(self.max_connections)
            .min_connections(self.min_connections)
            .acquire_timeout(Duration::from_secs(self.connect_timeout_secs))
            .idle_timeout(Duration::from_secs(self.idle_timeout_secs))
            .connect(&self.url)
            .await
            .map_err(|e| StorageError::connection(format!("Failed to connect to PostgreSQL: {}", e)))
    }
}

/// Translate a sqlx error into the storage taxonomy
pub(crate) fn map_sqlx_error(error: sqlx::Error, context: &str) -> StorageError {
    match &error {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            StorageError::duplicate_key(format!("{}: {}", context, db.message()))
        }
        sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed => StorageError::connection(format!("{}: {}", context, error)),
        _ => StorageError::unknown(format!("{}: {}", context, error)),
    }
}

/// Table names are interpolated into SQL, so only `[a-z_][a-z0-9_]*` is accepted
fn validate_table_name(name: &str) -> Result<(), StorageError> {
    let mut chars = name.chars();
    let valid_start = chars
        .next()
        .is_some_and(|c| c.is_ascii_lowercase() || c == '_');
    let valid_rest = chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_');

    if valid_start && valid_rest && name.len() <= 63 {
        Ok(())
    } else {
        Err(StorageError::unknown(format!("Invalid table name '{}'", name)))
    }
}

/// One table per collection: `(key TEXT PRIMARY KEY, data JSONB, created_at)`
pub struct PostgresStorage<E>
where
    E: StorageEntity,
{
    pool: PgPool,
    table: String,
    _entity: PhantomData<E>,
}

impl<E> Debug for PostgresStorage<E>
where
    E: StorageEntity,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostgresStorage")
            .field("table", &self.table)
            .finish()
    }
}

impl<E> PostgresStorage<E>
where
    E: StorageEntity,
{
    pub fn new(pool: PgPool, table: impl Into<String>) -> Result<Self, StorageError> {
        let table = table.into();
        validate_table_name(&table)?;

        Ok(Self {
            pool,
            table,
            _entity: PhantomData,
        })
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    /// Create the collection table if it does not exist yet
    pub async fn ensure_table(&self) -> Result<(), StorageError> {
        let ddl = format!(
            "CREATE TABLE IF NOT EXISTS {} (
                key TEXT PRIMARY KEY,
                data JSONB NOT NULL,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )",
            self.table
        );

        sqlx::query(&ddl)
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error(e, "Failed to create table"))?;

        Ok(())
    }

    fn decode(row: &PgRow) -> Result<E, StorageError> {
        let data: serde_json::Value = row
            .try_get("data")
            .map_err(|e| map_sqlx_error(e, "Failed to read document"))?;

        serde_json::from_value(data)
            .map_err(|e| StorageError::unknown(format!("Failed to deserialize document: {}", e)))
    }
}

#[async_trait]
impl<E> Storage<E> for PostgresStorage<E>
where
    E: StorageEntity + 'static,
{
    async fn get(&self, key: &E::Key) -> Result<Option<E>, StorageError> {
        let sql = format!("SELECT data FROM {} WHERE key = $1", self.table);

        sqlx::query(&sql)
            .bind(key.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error(e, "Failed to get document"))?
            .as_ref()
            .map(Self::decode)
            .transpose()
    }

    async fn list(&self) -> Result<Vec<E>, StorageError> {
        let sql = format!("SELECT data FROM {} ORDER BY created_at, key", self.table);

        sqlx::query(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_sqlx_error(e, "Failed to list documents"))?
            .iter()
            .map(Self::decode)
            .collect()
    }

    async fn create(&self, entity: E) -> Result<E, StorageError> {
        let data = serde_json::to_value(&entity)
            .map_err(|e| StorageError::unknown(format!("Failed to serialize document: {}", e)))?;
        let sql = format!(
            "INSERT INTO {} (key, data) VALUES ($1, $2) ON CONFLICT (key) DO NOTHING",
            self.table
        );

        let inserted = sqlx::query(&sql)
            .bind(entity.key().as_str())
            .bind(&data)
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error(e, "Failed to create document"))?
            .rows_affected();

        if inserted == 0 {
            return Err(StorageError::duplicate_key(format!(
                "Document with key '{}' already exists",
                entity.key().as_str()
            )));
        }

        Ok(entity)
    }

    async fn count(&self) -> Result<usize, StorageError> {
        let sql = format!("SELECT COUNT(*) FROM {}", self.table);

        let count: i64 = sqlx::query_scalar(&sql)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_sqlx_error(e, "Failed to count documents"))?;

        Ok(usize::try_from(count).unwrap_or_default())
    }
}
