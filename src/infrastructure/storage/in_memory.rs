//! In-memory storage implementation

use std::fmt::Debug;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::storage::{Filters, Storage, StorageRecord};
use crate::domain::DomainError;

/// Thread-safe in-memory table
///
/// Useful for testing and development. Data is lost when the process terminates.
/// Rows are returned in insertion order.
#[derive(Debug)]
pub struct InMemoryStorage<R>
where
    R: StorageRecord,
{
    rows: RwLock<Vec<R>>,
}

impl<R> Default for InMemoryStorage<R>
where
    R: StorageRecord,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<R> InMemoryStorage<R>
where
    R: StorageRecord,
{
    /// Creates a new empty in-memory table
    pub fn new() -> Self {
        Self {
            rows: RwLock::new(Vec::new()),
        }
    }

    /// Creates a table pre-populated with rows, kept as given
    pub fn with_rows(rows: Vec<R>) -> Self {
        Self {
            rows: RwLock::new(rows),
        }
    }
}

#[async_trait]
impl<R> Storage<R> for InMemoryStorage<R>
where
    R: StorageRecord,
{
    async fn query(&self, filters: &Filters) -> Result<Vec<R>, DomainError> {
        let rows = self.rows.read().map_err(|e| {
            DomainError::storage(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(rows
            .iter()
            .filter(|row| filters.matches_record(*row))
            .cloned()
            .collect())
    }

    async fn upsert(&self, mut record: R) -> Result<String, DomainError> {
        let id = record
            .id()
            .map(str::to_string)
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        let now = Utc::now().timestamp();

        let mut rows = self.rows.write().map_err(|e| {
            DomainError::storage(format!("Failed to acquire write lock: {}", e))
        })?;

        record.set_id(id.clone());

        match rows.iter_mut().find(|row| row.id() == Some(id.as_str())) {
            Some(existing) => {
                let created_at = existing.created_at().unwrap_or(now);
                record.stamp(created_at, now);
                *existing = record;
            }
            None => {
                record.stamp(now, now);
                rows.push(record);
            }
        }

        Ok(id)
    }

    async fn delete(&self, filters: &Filters) -> Result<usize, DomainError> {
        filters.ensure_scoped(R::TABLE)?;

        let mut rows = self.rows.write().map_err(|e| {
            DomainError::storage(format!("Failed to acquire write lock: {}", e))
        })?;

        let before = rows.len();
        rows.retain(|row| !filters.matches_record(row));
        Ok(before - rows.len())
    }

    async fn count(&self, filters: &Filters) -> Result<usize, DomainError> {
        let rows = self.rows.read().map_err(|e| {
            DomainError::storage(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(rows.iter().filter(|row| filters.matches_record(*row)).count())
    }
}
