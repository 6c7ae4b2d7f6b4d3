//! PostgreSQL storage implementation with connection pooling

use std::fmt::Debug;
use std::marker::PhantomData;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::{Postgres, QueryBuilder, Row};
use uuid::Uuid;

use crate::domain::storage::{Condition, Filters, Storage, StorageRecord, Table};
use crate::domain::DomainError;

/// PostgreSQL storage configuration
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    /// Database connection URL
    pub url: String,
    /// Maximum number of connections in the pool
    pub max_connections: u32,
    /// Minimum number of connections to maintain
    pub min_connections: u32,
    /// Connection timeout in seconds
    pub connect_timeout_secs: u64,
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            url: "postgres://localhost/model_registry".to_string(),
            max_connections: 10,
            min_connections: 1,
            connect_timeout_secs: 30,
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

    pub fn with_min_connections(mut self, min: u32) -> Self {
        self.min_connections = min;
        self
    }

    pub fn with_connect_timeout(mut self, secs: u64) -> Self {
        self.connect_timeout_secs = secs;
        self
    }

    /// Creates a lazily connecting pool; connection failures surface on first use
    pub fn connect_lazy(&self) -> Result<PgPool, DomainError> {
        PgPoolOptions::new()
            .max_connections(self.max_connections)
            .min_connections(self.min_connections)
            .acquire_timeout(std::time::Duration::from_secs(self.connect_timeout_secs))
            .connect_lazy(&self.url)
            .map_err(|e| DomainError::unavailable(format!("Invalid PostgreSQL URL: {}", e)))
    }
}

/// Name of the SQL table backing a store table
pub fn table_name(table: Table) -> String {
    format!("{}_{}", table.database().as_str(), table.as_str())
}

/// Creates every store table if missing
pub async fn ensure_tables(pool: &PgPool) -> Result<(), DomainError> {
    for table in Table::all() {
        let query = format!(
            r#"
            CREATE TABLE IF NOT EXISTS {} (
                key VARCHAR(255) PRIMARY KEY,
                data JSONB NOT NULL,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#,
            table_name(table)
        );

        sqlx::query(&query)
            .execute(pool)
            .await
            .map_err(|e| map_sqlx_error("create table", e))?;
    }

    Ok(())
}

/// Pool and connectivity failures mean the store is unreachable, everything else
/// is a storage error
fn map_sqlx_error(action: &str, error: sqlx::Error) -> DomainError {
    match error {
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
            DomainError::unavailable(format!("Database client not available: {}", error))
        }
        other => DomainError::storage(format!("Failed to {}: {}", action, other)),
    }
}

/// PostgreSQL-backed table
///
/// Stores rows as JSONB in a table with (key, data) columns and translates
/// keyword filters into conditions on the JSON document.
pub struct PostgresStorage<R>
where
    R: StorageRecord,
{
    pool: PgPool,
    table_name: String,
    _phantom: PhantomData<R>,
}

impl<R> Debug for PostgresStorage<R>
where
    R: StorageRecord,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostgresStorage")
            .field("table_name", &self.table_name)
            .finish()
    }
}

impl<R> PostgresStorage<R>
where
    R: StorageRecord,
{
    /// Creates a storage for the record's table on the given pool
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            table_name: table_name(R::TABLE),
            _phantom: PhantomData,
        }
    }

    fn push_filters(builder: &mut QueryBuilder<'_, Postgres>, filters: &Filters) {
        for (i, condition) in filters.conditions().iter().enumerate() {
            builder.push(if i == 0 { " WHERE " } else { " AND " });
            // Field names are compile-time constants, never caller input
            builder.push(format!("data->>'{}'", condition.field()));
            match condition {
                Condition::Eq { value, .. } => {
                    builder.push(" = ").push_bind(value.clone());
                }
                Condition::AnyOf { values, .. } => {
                    builder.push(" = ANY(").push_bind(values.clone()).push(")");
                }
            }
        }
    }

    fn decode(data: serde_json::Value) -> Result<R, DomainError> {
        serde_json::from_value(data)
            .map_err(|e| DomainError::storage(format!("Failed to deserialize {}: {}", R::TABLE, e)))
    }
}

#[async_trait]
impl<R> Storage<R> for PostgresStorage<R>
where
    R: StorageRecord,
{
    async fn query(&self, filters: &Filters) -> Result<Vec<R>, DomainError> {
        let mut builder = QueryBuilder::<Postgres>::new(format!("SELECT data FROM {}", self.table_name));
        Self::push_filters(&mut builder, filters);
        builder.push(" ORDER BY created_at");

        let rows = builder
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("query records", e))?;

        rows.into_iter()
            .map(|row| Self::decode(row.get("data")))
            .collect()
    }

    async fn count(&self, filters: &Filters) -> Result<usize, DomainError> {
        let mut builder =
            QueryBuilder::<Postgres>::new(format!("SELECT COUNT(*) AS count FROM {}", self.table_name));
        Self::push_filters(&mut builder, filters);

        let row = builder
            .build()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("count records", e))?;

        let count: i64 = row.get("count");
        Ok(count as usize)
    }

    async fn upsert(&self, mut record: R) -> Result<String, DomainError> {
        let id = record
            .id()
            .map(str::to_string)
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        let now = Utc::now().timestamp();

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("begin transaction", e))?;

        let existing = sqlx::query(&format!(
            "SELECT data FROM {} WHERE key = $1 FOR UPDATE",
            self.table_name
        ))
        .bind(&id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| map_sqlx_error("load record", e))?;

        let created_at = match existing {
            Some(row) => Self::decode(row.get("data"))?.created_at().unwrap_or(now),
            None => now,
        };

        record.set_id(id.clone());
        record.stamp(created_at, now);
        let data = serde_json::to_value(&record)
            .map_err(|e| DomainError::storage(format!("Failed to serialize {}: {}", R::TABLE, e)))?;

        sqlx::query(&format!(
            r#"
            INSERT INTO {} (key, data)
            VALUES ($1, $2)
            ON CONFLICT (key) DO UPDATE SET data = EXCLUDED.data, updated_at = NOW()
            "#,
            self.table_name
        ))
        .bind(&id)
        .bind(&data)
        .execute(&mut *tx)
        .await
        .map_err(|e| map_sqlx_error("upsert record", e))?;

        tx.commit()
            .await
            .map_err(|e| map_sqlx_error("commit transaction", e))?;

        Ok(id)
    }

    async fn delete(&self, filters: &Filters) -> Result<usize, DomainError> {
        filters.ensure_scoped(R::TABLE)?;

        let mut builder = QueryBuilder::<Postgres>::new(format!("DELETE FROM {}", self.table_name));
        Self::push_filters(&mut builder, filters);

        let result = builder
            .build()
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete records", e))?;

        Ok(result.rows_affected() as usize)
    }
}
