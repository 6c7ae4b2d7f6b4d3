//! Shared fixtures for component operation tests

use std::sync::Arc;

use crate::domain::alias::AliasRow;
use crate::domain::annotation::AnnotationRow;
use crate::domain::component::ComponentType;
use crate::domain::context::ComponentContext;
use crate::domain::directory::DirectoryRow;
use crate::domain::model::ModelRow;
use crate::domain::model_version::ModelVersionRow;
use crate::domain::storage::mock::{Journal, MockStorage, StoreCall, StoreOp};
use crate::domain::storage::Table;
use crate::infrastructure::alias::StoreAliasResolver;
use crate::infrastructure::blob::InMemoryBlobStore;

/// Mock tables sharing one call journal, plus an in-memory blob store
pub struct Fixture {
    pub journal: Journal,
    pub models: Arc<MockStorage<ModelRow>>,
    pub versions: Arc<MockStorage<ModelVersionRow>>,
    pub directories: Arc<MockStorage<DirectoryRow>>,
    pub annotations: Arc<MockStorage<AnnotationRow>>,
    pub aliases: Arc<MockStorage<AliasRow>>,
    pub blobs: Arc<InMemoryBlobStore>,
}

impl Fixture {
    pub fn new() -> Self {
        let journal = Journal::default();
        Self {
            models: Arc::new(MockStorage::with_journal(journal.clone())),
            versions: Arc::new(MockStorage::with_journal(journal.clone())),
            directories: Arc::new(MockStorage::with_journal(journal.clone())),
            annotations: Arc::new(MockStorage::with_journal(journal.clone())),
            aliases: Arc::new(MockStorage::with_journal(journal.clone())),
            blobs: Arc::new(InMemoryBlobStore::new()),
            journal,
        }
    }

    pub fn context(&self) -> ComponentContext {
        ComponentContext {
            models: self.models.clone(),
            versions: self.versions.clone(),
            directories: self.directories.clone(),
            annotations: self.annotations.clone(),
            aliases: Arc::new(StoreAliasResolver::new(self.aliases.clone())),
            blobs: self.blobs.clone(),
        }
    }

    /// Every store call made so far, in order
    pub fn calls(&self) -> Vec<StoreCall> {
        self.journal.lock().unwrap().clone()
    }

    /// Calls of one kind against one table
    pub fn calls_to(&self, op: StoreOp, table: Table) -> Vec<StoreCall> {
        self.calls()
            .into_iter()
            .filter(|call| call.op == op && call.table == table)
            .collect()
    }

    pub fn clear_calls(&self) {
        self.journal.lock().unwrap().clear();
    }

    pub fn with_model(self, model_id: &str, project_id: &str, name: &str) -> Self {
        self.models.insert(model_row(model_id, project_id, name));
        self
    }

    pub fn with_version(self, version_id: &str, model_id: &str, version: &str) -> Self {
        self.versions.insert(version_row(version_id, model_id, version));
        self
    }

    pub fn with_directory(
        self,
        directory_id: &str,
        project_id: &str,
        component_type: ComponentType,
    ) -> Self {
        self.directories
            .insert(DirectoryRow::new(project_id, component_type).with_id(directory_id));
        self
    }

    pub fn with_alias(self, project_id: &str, alias: &str, component_id: &str) -> Self {
        let mut row = AliasRow::new(project_id, alias, component_id);
        row.alias_id = Some(format!("alias-{}-{}", project_id, alias));
        self.aliases.insert(row);
        self
    }

    pub fn with_annotation(self, component_type: ComponentType, component_id: &str) -> Self {
        let mut row = AnnotationRow::new(component_type, component_id).with_content("note");
        row.annotation_id = Some(format!("annotation-{}", component_id));
        self.annotations.insert(row);
        self
    }
}

pub fn model_row(model_id: &str, project_id: &str, name: &str) -> ModelRow {
    ModelRow {
        model_id: Some(model_id.to_string()),
        project_id: Some(project_id.to_string()),
        name: Some(name.to_string()),
        created_at: Some(1_672_549_140),
        modified_at: Some(1_672_549_140),
        ..Default::default()
    }
}

pub fn version_row(version_id: &str, model_id: &str, version: &str) -> ModelVersionRow {
    ModelVersionRow {
        version_id: Some(version_id.to_string()),
        model_id: Some(model_id.to_string()),
        version: Some(version.to_string()),
        created_at: Some(1_672_549_140),
        modified_at: Some(1_672_549_140),
        ..Default::default()
    }
}
