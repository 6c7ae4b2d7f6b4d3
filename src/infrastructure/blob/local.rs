//! Filesystem blob store

use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;
use tracing::debug;

use super::ensure_relative;
use crate::domain::blob::{BlobBucket, BlobStore};
use crate::domain::DomainError;

/// Blob store laying buckets out as directories under a root
#[derive(Debug, Clone)]
pub struct LocalBlobStore {
    root: PathBuf,
}

impl LocalBlobStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Absolute location of a namespace inside a bucket
    pub fn resolve(&self, bucket: BlobBucket, path: &str) -> Result<PathBuf, DomainError> {
        ensure_relative(path)?;
        Ok(self.root.join(bucket.as_str()).join(path))
    }
}

#[async_trait]
impl BlobStore for LocalBlobStore {
    async fn delete_directory(&self, bucket: BlobBucket, path: &str) -> Result<(), DomainError> {
        let target = self.resolve(bucket, path)?;

        match tokio::fs::remove_dir_all(&target).await {
            Ok(()) => {
                debug!(path = %target.display(), "Deleted blob directory");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(DomainError::blob(format!(
                "Failed to delete {}: {}",
                target.display(),
                e
            ))),
        }
    }
}
