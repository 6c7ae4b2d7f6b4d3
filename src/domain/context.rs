//! Collaborator handles used by entity and collection operations

use std::fmt;
use std::sync::Arc;

use crate::domain::alias::AliasResolver;
use crate::domain::annotation::AnnotationRow;
use crate::domain::blob::BlobStore;
use crate::domain::directory::DirectoryRow;
use crate::domain::model::ModelRow;
use crate::domain::model_version::ModelVersionRow;
use crate::domain::storage::Storage;

/// Every collaborator a component operation may talk to
#[derive(Clone)]
pub struct ComponentContext {
    pub models: Arc<dyn Storage<ModelRow>>,
    pub versions: Arc<dyn Storage<ModelVersionRow>>,
    pub directories: Arc<dyn Storage<DirectoryRow>>,
    pub annotations: Arc<dyn Storage<AnnotationRow>>,
    pub aliases: Arc<dyn AliasResolver>,
    pub blobs: Arc<dyn BlobStore>,
}

impl fmt::Debug for ComponentContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentContext")
            .field("models", &self.models)
            .field("versions", &self.versions)
            .field("directories", &self.directories)
            .field("annotations", &self.annotations)
            .finish_non_exhaustive()
    }
}
