//! Storage trait definition

use std::fmt::Debug;

use async_trait::async_trait;

use crate::domain::DomainError;

use super::entity::StorageRecord;
use super::filter::Filters;

/// Store gateway for one table of typed rows
#[async_trait]
pub trait Storage<R>: Send + Sync + Debug
where
    R: StorageRecord,
{
    /// Returns every row matching the filters, in store iteration order
    async fn query(&self, filters: &Filters) -> Result<Vec<R>, DomainError>;

    /// Returns the first matching row, failing with not-found when none matches
    async fn query_one(&self, filters: &Filters) -> Result<R, DomainError> {
        self.query(filters)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| {
                DomainError::not_found(format!("No {} record matches {}", R::TABLE, filters))
            })
    }

    /// Counts the rows matching the filters
    async fn count(&self, filters: &Filters) -> Result<usize, DomainError> {
        Ok(self.query(filters).await?.len())
    }

    /// Inserts or updates a row keyed by its identity and returns the canonical id
    async fn upsert(&self, record: R) -> Result<String, DomainError>;

    /// Deletes every matching row, returns how many were removed
    async fn delete(&self, filters: &Filters) -> Result<usize, DomainError>;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::sync::{Arc, Mutex};

    use crate::domain::storage::Table;

    /// Kind of store request
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum StoreOp {
        Query,
        Upsert,
        Delete,
    }

    /// A journaled store request
    #[derive(Debug, Clone, PartialEq)]
    pub struct StoreCall {
        pub op: StoreOp,
        pub table: Table,
        pub filters: Filters,
    }

    /// Journal shared between the mock stores of one test
    pub type Journal = Arc<Mutex<Vec<StoreCall>>>;

    /// Mock storage recording every call, for testing
    #[derive(Debug)]
    pub struct MockStorage<R>
    where
        R: StorageRecord,
    {
        rows: Mutex<Vec<R>>,
        journal: Journal,
        error: Mutex<Option<(Option<StoreOp>, String)>>,
        next_id: Mutex<usize>,
    }

    impl<R> Default for MockStorage<R>
    where
        R: StorageRecord,
    {
        fn default() -> Self {
            Self::new()
        }
    }

    impl<R> MockStorage<R>
    where
        R: StorageRecord,
    {
        pub fn new() -> Self {
            Self::with_journal(Journal::default())
        }

        pub fn with_journal(journal: Journal) -> Self {
            Self {
                rows: Mutex::new(Vec::new()),
                journal,
                error: Mutex::new(None),
                next_id: Mutex::new(0),
            }
        }

        pub fn with_record(self, record: R) -> Self {
            self.rows.lock().unwrap().push(record);
            self
        }

        pub fn insert(&self, record: R) {
            self.rows.lock().unwrap().push(record);
        }

        /// Fails every request with a storage error
        pub fn with_error(self, error: impl Into<String>) -> Self {
            *self.error.lock().unwrap() = Some((None, error.into()));
            self
        }

        /// Fails only requests of one kind
        pub fn with_error_on(self, op: StoreOp, error: impl Into<String>) -> Self {
            *self.error.lock().unwrap() = Some((Some(op), error.into()));
            self
        }

        pub fn rows(&self) -> Vec<R> {
            self.rows.lock().unwrap().clone()
        }

        pub fn calls(&self) -> Vec<StoreCall> {
            self.journal.lock().unwrap().clone()
        }

        fn record(&self, op: StoreOp, filters: &Filters) {
            self.journal.lock().unwrap().push(StoreCall {
                op,
                table: R::TABLE,
                filters: filters.clone(),
            });
        }

        fn check_error(&self, op: StoreOp) -> Result<(), DomainError> {
            match self.error.lock().unwrap().clone() {
                Some((failing, error)) if failing.is_none_or(|f| f == op) => {
                    Err(DomainError::storage(error))
                }
                _ => Ok(()),
            }
        }
    }

    #[async_trait]
    impl<R> Storage<R> for MockStorage<R>
    where
        R: StorageRecord,
    {
        async fn query(&self, filters: &Filters) -> Result<Vec<R>, DomainError> {
            self.record(StoreOp::Query, filters);
            self.check_error(StoreOp::Query)?;
            Ok(self
                .rows
                .lock()
                .unwrap()
                .iter()
                .filter(|row| filters.matches_record(*row))
                .cloned()
                .collect())
        }

        async fn upsert(&self, mut record: R) -> Result<String, DomainError> {
            let id = match record.id() {
                Some(id) => id.to_string(),
                None => {
                    let mut next = self.next_id.lock().unwrap();
                    *next += 1;
                    format!("{}-{}", R::TABLE.as_str(), *next)
                }
            };
            self.record(
                StoreOp::Upsert,
                &Filters::new().eq(R::TABLE.id_field(), id.clone()),
            );
            self.check_error(StoreOp::Upsert)?;

            record.set_id(id.clone());
            let mut rows = self.rows.lock().unwrap();
            match rows.iter_mut().find(|row| row.id() == Some(id.as_str())) {
                Some(existing) => *existing = record,
                None => rows.push(record),
            }
            Ok(id)
        }

        async fn delete(&self, filters: &Filters) -> Result<usize, DomainError> {
            self.record(StoreOp::Delete, filters);
            self.check_error(StoreOp::Delete)?;
            filters.ensure_scoped(R::TABLE)?;

            let mut rows = self.rows.lock().unwrap();
            let before = rows.len();
            rows.retain(|row| !filters.matches_record(row));
            Ok(before - rows.len())
        }
    }
}
