//! Domain layer - Core entities, invariants and collaborator contracts

pub mod alias;
pub mod annotation;
pub mod blob;
pub mod component;
pub mod context;
pub mod directory;
pub mod error;
pub mod model;
pub mod model_version;
pub mod storage;
pub mod validation;

#[cfg(test)]
pub(crate) mod test_support;

pub use alias::{is_alias, resolve_alias, AliasResolver, AliasRow};
pub use annotation::AnnotationRow;
pub use blob::{BlobBucket, BlobStore};
pub use component::ComponentType;
pub use context::ComponentContext;
pub use directory::DirectoryRow;
pub use error::DomainError;
pub use model::{Model, ModelRow, Models};
pub use model_version::{Document, ModelVersion, ModelVersionRow, ModelVersions};
pub use storage::{Filters, Storage, StorageRecord, Table};
pub use validation::{validate_filename, NameValidationError};
