//! Model entity and related types

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::domain::alias::{ensure_resolved, resolve_alias};
use crate::domain::annotation::annotation_filters;
use crate::domain::blob::{model_namespace, BlobBucket};
use crate::domain::component::ComponentType;
use crate::domain::context::ComponentContext;
use crate::domain::directory::directory_filters;
use crate::domain::model_version::ModelVersions;
use crate::domain::storage::{Filters, StorageRecord, Table};
use crate::domain::validation::validate_filename;
use crate::domain::DomainError;

/// Row of the model table
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelRow {
    pub model_id: Option<String>,
    pub project_id: Option<String>,
    pub name: Option<String>,
    pub latest_version_id: Option<String>,
    pub model_type: Option<String>,
    pub sub_model_type: Option<String>,
    pub description: Option<String>,
    pub directory_id: Option<String>,
    pub created_at: Option<i64>,
    pub modified_at: Option<i64>,
}

impl StorageRecord for ModelRow {
    const TABLE: Table = Table::Model;

    fn id(&self) -> Option<&str> {
        self.model_id.as_deref()
    }

    fn set_id(&mut self, id: String) {
        self.model_id = Some(id);
    }

    fn created_at(&self) -> Option<i64> {
        self.created_at
    }

    fn stamp(&mut self, created_at: i64, modified_at: i64) {
        self.created_at = Some(created_at);
        self.modified_at = Some(modified_at);
    }
}

/// Model entity: metadata of a machine-learning model inside a project
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Model {
    /// Store-assigned identity; may hold an alias until resolved
    model_id: Option<String>,

    /// Owning project, immutable once persisted
    project_id: Option<String>,

    /// Unique within the project, must be a valid file name
    name: Option<String>,

    latest_version_id: Option<String>,
    model_type: Option<String>,
    sub_model_type: Option<String>,
    description: Option<String>,

    /// Directory of model type in the same project
    directory_id: Option<String>,

    // Managed by the store
    created_at: Option<i64>,
    modified_at: Option<i64>,
}

impl Model {
    /// Create an empty, not yet persisted model
    pub fn new() -> Self {
        Self::default()
    }

    // Builders

    pub fn with_id(mut self, model_id: impl Into<String>) -> Self {
        self.model_id = Some(model_id.into());
        self
    }

    pub fn with_project_id(mut self, project_id: impl Into<String>) -> Self {
        self.project_id = Some(project_id.into());
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_latest_version_id(mut self, latest_version_id: impl Into<String>) -> Self {
        self.latest_version_id = Some(latest_version_id.into());
        self
    }

    pub fn with_model_type(mut self, model_type: impl Into<String>) -> Self {
        self.model_type = Some(model_type.into());
        self
    }

    pub fn with_sub_model_type(mut self, sub_model_type: impl Into<String>) -> Self {
        self.sub_model_type = Some(sub_model_type.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_directory_id(mut self, directory_id: impl Into<String>) -> Self {
        self.directory_id = Some(directory_id.into());
        self
    }

    // Getters

    pub fn model_id(&self) -> Option<&str> {
        self.model_id.as_deref()
    }

    pub fn project_id(&self) -> Option<&str> {
        self.project_id.as_deref()
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn latest_version_id(&self) -> Option<&str> {
        self.latest_version_id.as_deref()
    }

    pub fn model_type(&self) -> Option<&str> {
        self.model_type.as_deref()
    }

    pub fn sub_model_type(&self) -> Option<&str> {
        self.sub_model_type.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn directory_id(&self) -> Option<&str> {
        self.directory_id.as_deref()
    }

    pub fn created_at(&self) -> Option<i64> {
        self.created_at
    }

    pub fn modified_at(&self) -> Option<i64> {
        self.modified_at
    }

    // Mutators

    pub fn set_model_id(&mut self, model_id: Option<String>) {
        self.model_id = model_id;
    }

    pub fn set_project_id(&mut self, project_id: Option<String>) {
        self.project_id = project_id;
    }

    pub fn set_name(&mut self, name: Option<String>) {
        self.name = name;
    }

    pub fn set_latest_version_id(&mut self, latest_version_id: Option<String>) {
        self.latest_version_id = latest_version_id;
    }

    pub fn set_model_type(&mut self, model_type: Option<String>) {
        self.model_type = model_type;
    }

    pub fn set_sub_model_type(&mut self, sub_model_type: Option<String>) {
        self.sub_model_type = sub_model_type;
    }

    pub fn set_description(&mut self, description: Option<String>) {
        self.description = description;
    }

    pub fn set_directory_id(&mut self, directory_id: Option<String>) {
        self.directory_id = directory_id;
    }

    pub(crate) fn set_timestamps(&mut self, created_at: Option<i64>, modified_at: Option<i64>) {
        self.created_at = created_at;
        self.modified_at = modified_at;
    }

    // Row mapping

    pub fn from_row(row: ModelRow) -> Self {
        Self {
            model_id: row.model_id,
            project_id: row.project_id,
            name: row.name,
            latest_version_id: row.latest_version_id,
            model_type: row.model_type,
            sub_model_type: row.sub_model_type,
            description: row.description,
            directory_id: row.directory_id,
            created_at: row.created_at,
            modified_at: row.modified_at,
        }
    }

    pub fn to_row(&self) -> ModelRow {
        ModelRow {
            model_id: self.model_id.clone(),
            project_id: self.project_id.clone(),
            name: self.name.clone(),
            latest_version_id: self.latest_version_id.clone(),
            model_type: self.model_type.clone(),
            sub_model_type: self.sub_model_type.clone(),
            description: self.description.clone(),
            directory_id: self.directory_id.clone(),
            created_at: self.created_at,
            modified_at: self.modified_at,
        }
    }

    // Alias resolution

    /// Convert a model alias back to the model id, if necessary
    pub async fn resolve_alias(
        ctx: &ComponentContext,
        model_id: &str,
        project_id: Option<&str>,
    ) -> Result<String, DomainError> {
        resolve_alias(ctx.aliases.as_ref(), model_id, project_id).await
    }

    /// Convert a directory alias back to the directory id, if necessary
    pub async fn resolve_directory_alias(
        ctx: &ComponentContext,
        directory_id: &str,
        project_id: Option<&str>,
    ) -> Result<String, DomainError> {
        resolve_alias(ctx.aliases.as_ref(), directory_id, project_id).await
    }

    // Validation

    /// Check the validity of the model against the store. Must pass before `push`.
    pub async fn validate(&self, ctx: &ComponentContext) -> Result<(), DomainError> {
        let mut scope = self.project_id.clone().filter(|p| !p.is_empty());

        if let Some(model_id) = self.model_id.as_deref() {
            ensure_resolved(Some(model_id))?;

            let record = ctx.models.query_one(&by_id(model_id)).await?;

            if let Some(project_id) = scope.as_deref() {
                if record.project_id.as_deref() != Some(project_id) {
                    return Err(DomainError::invalid_input(
                        "The model does not belong to the specified project",
                    ));
                }
            }
            scope = scope.or(record.project_id);
        }

        if let Some(name) = self.name.as_deref().filter(|n| !n.is_empty()) {
            self.validate_name(ctx, name, scope.as_deref()).await?;
        }

        if let Some(directory_id) = self.directory_id.as_deref().filter(|d| !d.is_empty()) {
            self.validate_directory(ctx, directory_id, scope.as_deref())
                .await?;
        }

        Ok(())
    }

    async fn validate_name(
        &self,
        ctx: &ComponentContext,
        name: &str,
        project_id: Option<&str>,
    ) -> Result<(), DomainError> {
        let project_id = project_id.ok_or_else(|| {
            DomainError::invalid_input("Project must be provided to validate the model name")
        })?;

        let siblings = ctx
            .models
            .query(&Filters::new().eq("project_id", project_id))
            .await?;

        let own = self.model_id.as_deref();
        let taken = siblings
            .iter()
            .filter(|m| m.model_id.as_deref() != own)
            .any(|m| m.name.as_deref() == Some(name));

        if taken {
            return Err(DomainError::invalid_input(format!(
                "A model with name {} already exists",
                name
            )));
        }

        let name_on_record = own
            .and_then(|id| siblings.iter().find(|m| m.model_id.as_deref() == Some(id)))
            .and_then(|m| m.name.as_deref());

        if name_on_record != Some(name) {
            validate_filename(name)
                .map_err(|e| DomainError::invalid_input(format!("Invalid name: {}", e)))?;
        }

        Ok(())
    }

    async fn validate_directory(
        &self,
        ctx: &ComponentContext,
        directory_id: &str,
        project_id: Option<&str>,
    ) -> Result<(), DomainError> {
        let project_id = project_id.ok_or_else(|| {
            DomainError::invalid_input("Project must be provided to validate the model directory")
        })?;

        let typed = directory_filters(directory_id, Some(project_id), Some(ComponentType::Model));
        if ctx.directories.count(&typed).await? > 0 {
            return Ok(());
        }

        let untyped = directory_filters(directory_id, Some(project_id), None);
        if ctx.directories.count(&untyped).await? > 0 {
            return Err(DomainError::invalid_input(
                "Model cannot be in a different directory type",
            ));
        }

        Err(DomainError::not_found(format!(
            "Directory {} not found",
            directory_id
        )))
    }

    // Store operations

    /// Pull the model with the given id (or alias) from the store
    pub async fn pull(
        ctx: &ComponentContext,
        model_id: Option<&str>,
        project_id: Option<&str>,
    ) -> Result<Self, DomainError> {
        let model_id = model_id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| DomainError::not_found("Model ID must be provided"))?;

        let model_id = Self::resolve_alias(ctx, model_id, project_id).await?;
        let filters = by_id(&model_id).eq_opt("project_id", project_id);

        debug!(model_id = %model_id, "Pulling model");
        let row = ctx.models.query_one(&filters).await?;

        Ok(Self::from_row(row))
    }

    /// Push the (potentially updated) model to the store.
    /// The canonical id returned by the store is written back on success.
    pub async fn push(&mut self, ctx: &ComponentContext) -> Result<(), DomainError> {
        ensure_resolved(self.model_id.as_deref())?;

        let mut row = self.to_row();
        if row.project_id.is_none() {
            if let Some(model_id) = self.model_id.as_deref() {
                row.project_id = ctx.models.query_one(&by_id(model_id)).await?.project_id;
            }
        }
        let project_id = row.project_id.clone();

        let model_id = ctx.models.upsert(row).await?;
        debug!(model_id = %model_id, "Pushed model");
        self.model_id = Some(model_id);
        self.project_id = project_id;

        Ok(())
    }

    /// Delete the model and everything it owns: versions, blob namespace,
    /// annotations and aliases
    pub async fn delete(&self, ctx: &ComponentContext) -> Result<(), DomainError> {
        ensure_resolved(self.model_id.as_deref())?;

        let model = Self::pull(ctx, self.model_id.as_deref(), None).await?;
        let model_id = model
            .model_id
            .clone()
            .ok_or_else(|| DomainError::storage("Model record is missing its model_id"))?;

        ModelVersions::delete(ctx, &model_id).await?;

        ctx.models.delete(&by_id(&model_id)).await?;

        match model.project_id.as_deref().filter(|p| !p.is_empty()) {
            Some(project_id) => {
                ctx.blobs
                    .delete_directory(BlobBucket::Model, &model_namespace(project_id, &model_id))
                    .await?;
            }
            None => warn!(model_id = %model_id, "Model has no project, skipping blob cleanup"),
        }

        ctx.annotations
            .delete(&annotation_filters(ComponentType::Model, &model_id))
            .await?;

        ctx.aliases.delete_for_component(&model_id).await?;

        info!(model_id = %model_id, "Deleted model");
        Ok(())
    }
}

fn by_id(model_id: &str) -> Filters {
    Filters::new().eq("model_id", model_id)
}
