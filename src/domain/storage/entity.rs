//! Storage record traits and table targets

use std::fmt::{self, Debug};

use serde::{de::DeserializeOwned, Serialize};

/// Logical database a table lives in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Database {
    Service,
}

impl Database {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Service => "service",
        }
    }
}

/// Named table targets of the store gateway
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    Model,
    ModelVersion,
    Directory,
    Annotation,
    ProjectAlias,
}

impl Table {
    pub fn database(&self) -> Database {
        Database::Service
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Model => "model",
            Self::ModelVersion => "model_version",
            Self::Directory => "directory",
            Self::Annotation => "annotation",
            Self::ProjectAlias => "project_alias",
        }
    }

    /// Name of the field holding the store-assigned identity
    pub fn id_field(&self) -> &'static str {
        match self {
            Self::Model => "model_id",
            Self::ModelVersion => "version_id",
            Self::Directory => "directory_id",
            Self::Annotation => "annotation_id",
            Self::ProjectAlias => "alias_id",
        }
    }

    pub fn all() -> [Table; 5] {
        [
            Self::Model,
            Self::ModelVersion,
            Self::Directory,
            Self::Annotation,
            Self::ProjectAlias,
        ]
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.database().as_str(), self.as_str())
    }
}

/// A strongly typed row of one store table
///
/// Rows are serialized to a flat JSON object whose top-level keys are the
/// column names used by [`Filters`](super::Filters).
pub trait StorageRecord: Clone + Debug + Send + Sync + Serialize + DeserializeOwned + 'static {
    /// The table this row belongs to
    const TABLE: Table;

    /// Returns the store-assigned identity, if already persisted
    fn id(&self) -> Option<&str>;

    /// Writes the store-assigned identity
    fn set_id(&mut self, id: String);

    /// Returns the creation timestamp (epoch seconds), if tracked
    fn created_at(&self) -> Option<i64> {
        None
    }

    /// Applies store-managed timestamps. Tables without timestamps ignore this.
    fn stamp(&mut self, _created_at: i64, _modified_at: i64) {}
}
