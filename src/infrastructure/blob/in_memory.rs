//! In-memory blob store

use std::collections::BTreeMap;
use std::sync::RwLock;

use async_trait::async_trait;

use super::ensure_relative;
use crate::domain::blob::{BlobBucket, BlobStore};
use crate::domain::DomainError;

/// Blob store keeping objects in memory, keyed by bucket and path
#[derive(Debug, Default)]
pub struct InMemoryBlobStore {
    objects: RwLock<BTreeMap<(BlobBucket, String), Vec<u8>>>,
    deleted: RwLock<Vec<(BlobBucket, String)>>,
}

impl InMemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores an object at `path` inside the bucket
    pub fn put(&self, bucket: BlobBucket, path: impl Into<String>, data: impl Into<Vec<u8>>) {
        if let Ok(mut objects) = self.objects.write() {
            objects.insert((bucket, path.into()), data.into());
        }
    }

    pub fn exists(&self, bucket: BlobBucket, path: &str) -> bool {
        self.objects
            .read()
            .map(|objects| objects.contains_key(&(bucket, path.to_string())))
            .unwrap_or(false)
    }

    /// Every namespace passed to `delete_directory`, in call order
    pub fn deleted_directories(&self) -> Vec<(BlobBucket, String)> {
        self.deleted
            .read()
            .map(|deleted| deleted.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl BlobStore for InMemoryBlobStore {
    async fn delete_directory(&self, bucket: BlobBucket, path: &str) -> Result<(), DomainError> {
        ensure_relative(path)?;

        let prefix = format!("{}/", path.trim_end_matches('/'));
        let mut objects = self
            .objects
            .write()
            .map_err(|e| DomainError::blob(format!("Failed to acquire write lock: {}", e)))?;
        objects.retain(|(b, key), _| *b != bucket || !(key == path || key.starts_with(&prefix)));

        self.deleted
            .write()
            .map_err(|e| DomainError::blob(format!("Failed to acquire write lock: {}", e)))?
            .push((bucket, path.to_string()));

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_delete_directory_is_prefix_scoped() {
        let store = InMemoryBlobStore::new();
        store.put(BlobBucket::Model, "p1/m1/v1/model.bin", b"a".to_vec());
        store.put(BlobBucket::Model, "p1/m10/v1/model.bin", b"b".to_vec());

        store.delete_directory(BlobBucket::Model, "p1/m1").await.unwrap();

        assert!(!store.exists(BlobBucket::Model, "p1/m1/v1/model.bin"));
        assert!(store.exists(BlobBucket::Model, "p1/m10/v1/model.bin"));
        assert_eq!(
            store.deleted_directories(),
            vec![(BlobBucket::Model, "p1/m1".to_string())]
        );
    }
}
