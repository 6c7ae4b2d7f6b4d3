//! Object store namespaces owned by components

use std::fmt;

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use crate::domain::DomainError;

/// Top-level namespace of the object store
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BlobBucket {
    Model,
}

impl BlobBucket {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Model => "model",
        }
    }
}

impl fmt::Display for BlobBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Object store collaborator
#[cfg_attr(test, automock)]
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Recursively deletes everything under `path` in the bucket.
    /// Deleting a missing path succeeds.
    async fn delete_directory(&self, bucket: BlobBucket, path: &str) -> Result<(), DomainError>;
}

/// Path of a model's namespace inside the model bucket
pub fn model_namespace(project_id: &str, model_id: &str) -> String {
    format!("{}/{}", project_id, model_id)
}
