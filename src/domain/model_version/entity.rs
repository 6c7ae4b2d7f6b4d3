//! ModelVersion entity

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::domain::alias::{ensure_resolved, resolve_alias};
use crate::domain::context::ComponentContext;
use crate::domain::storage::{Filters, StorageRecord, Table};
use crate::domain::validation::validate_filename;
use crate::domain::DomainError;

/// Nested key/value document (hyperparameters, metrics), opaque to the registry
pub type Document = Map<String, Value>;

/// Row of the model version table
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelVersionRow {
    pub version_id: Option<String>,
    pub model_id: Option<String>,
    pub version: Option<String>,
    pub hyperparameters: Option<Document>,
    pub metrics: Option<Document>,
    pub fold_metrics: Option<Document>,
    pub created_at: Option<i64>,
    pub modified_at: Option<i64>,
}

impl StorageRecord for ModelVersionRow {
    const TABLE: Table = Table::ModelVersion;

    fn id(&self) -> Option<&str> {
        self.version_id.as_deref()
    }

    fn set_id(&mut self, id: String) {
        self.version_id = Some(id);
    }

    fn created_at(&self) -> Option<i64> {
        self.created_at
    }

    fn stamp(&mut self, created_at: i64, modified_at: i64) {
        self.created_at = Some(created_at);
        self.modified_at = Some(modified_at);
    }
}

/// A trained version of a model
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModelVersion {
    version_id: Option<String>,
    /// Owning model, immutable once persisted
    model_id: Option<String>,
    /// Label unique among the versions of the same model
    version: Option<String>,
    hyperparameters: Option<Document>,
    metrics: Option<Document>,
    fold_metrics: Option<Document>,
    created_at: Option<i64>,
    modified_at: Option<i64>,
}

impl ModelVersion {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_id(mut self, version_id: impl Into<String>) -> Self {
        self.version_id = Some(version_id.into());
        self
    }

    pub fn with_model_id(mut self, model_id: impl Into<String>) -> Self {
        self.model_id = Some(model_id.into());
        self
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn with_hyperparameters(mut self, hyperparameters: Document) -> Self {
        self.hyperparameters = Some(hyperparameters);
        self
    }

    pub fn with_metrics(mut self, metrics: Document) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn with_fold_metrics(mut self, fold_metrics: Document) -> Self {
        self.fold_metrics = Some(fold_metrics);
        self
    }

    pub fn version_id(&self) -> Option<&str> {
        self.version_id.as_deref()
    }

    pub fn model_id(&self) -> Option<&str> {
        self.model_id.as_deref()
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    pub fn hyperparameters(&self) -> Option<&Document> {
        self.hyperparameters.as_ref()
    }

    pub fn metrics(&self) -> Option<&Document> {
        self.metrics.as_ref()
    }

    pub fn fold_metrics(&self) -> Option<&Document> {
        self.fold_metrics.as_ref()
    }

    pub fn created_at(&self) -> Option<i64> {
        self.created_at
    }

    pub fn modified_at(&self) -> Option<i64> {
        self.modified_at
    }

    pub fn set_version_id(&mut self, version_id: Option<String>) {
        self.version_id = version_id;
    }

    pub fn set_model_id(&mut self, model_id: Option<String>) {
        self.model_id = model_id;
    }

    pub fn set_version(&mut self, version: Option<String>) {
        self.version = version;
    }

    pub fn set_hyperparameters(&mut self, hyperparameters: Option<Document>) {
        self.hyperparameters = hyperparameters;
    }

    pub fn set_metrics(&mut self, metrics: Option<Document>) {
        self.metrics = metrics;
    }

    pub fn set_fold_metrics(&mut self, fold_metrics: Option<Document>) {
        self.fold_metrics = fold_metrics;
    }

    pub(crate) fn set_timestamps(&mut self, created_at: Option<i64>, modified_at: Option<i64>) {
        self.created_at = created_at;
        self.modified_at = modified_at;
    }

    pub fn from_row(row: ModelVersionRow) -> Self {
        Self {
            version_id: row.version_id,
            model_id: row.model_id,
            version: row.version,
            hyperparameters: row.hyperparameters,
            metrics: row.metrics,
            fold_metrics: row.fold_metrics,
            created_at: row.created_at,
            modified_at: row.modified_at,
        }
    }

    pub fn to_row(&self) -> ModelVersionRow {
        ModelVersionRow {
            version_id: self.version_id.clone(),
            model_id: self.model_id.clone(),
            version: self.version.clone(),
            hyperparameters: self.hyperparameters.clone(),
            metrics: self.metrics.clone(),
            fold_metrics: self.fold_metrics.clone(),
            created_at: self.created_at,
            modified_at: self.modified_at,
        }
    }

    /// Convert a version alias back to the version id, if necessary
    pub async fn resolve_alias(
        ctx: &ComponentContext,
        version_id: &str,
        project_id: Option<&str>,
    ) -> Result<String, DomainError> {
        resolve_alias(ctx.aliases.as_ref(), version_id, project_id).await
    }

    /// Check the validity of the version against the store. Must pass before `push`.
    pub async fn validate(&self, ctx: &ComponentContext) -> Result<(), DomainError> {
        let mut scope = self.model_id.clone().filter(|m| !m.is_empty());

        if let Some(version_id) = self.version_id.as_deref() {
            ensure_resolved(Some(version_id))?;

            let record = ctx.versions.query_one(&by_id(version_id)).await?;

            if let Some(model_id) = scope.as_deref() {
                if record.model_id.as_deref() != Some(model_id) {
                    return Err(DomainError::invalid_input(
                        "The model version does not belong to the specified model",
                    ));
                }
            }
            scope = scope.or(record.model_id);
        }

        let Some(version) = self.version.as_deref().filter(|v| !v.is_empty()) else {
            return Ok(());
        };

        let model_id = scope.ok_or_else(|| {
            DomainError::invalid_input("Model must be provided to validate the version")
        })?;

        let siblings = ctx
            .versions
            .query(&Filters::new().eq("model_id", model_id))
            .await?;

        let own = self.version_id.as_deref();
        let taken = siblings
            .iter()
            .filter(|v| v.version_id.as_deref() != own)
            .any(|v| v.version.as_deref() == Some(version));

        if taken {
            return Err(DomainError::invalid_input(format!(
                "A model version {} already exists",
                version
            )));
        }

        let version_on_record = own
            .and_then(|id| siblings.iter().find(|v| v.version_id.as_deref() == Some(id)))
            .and_then(|v| v.version.as_deref());

        if version_on_record != Some(version) {
            validate_filename(version)
                .map_err(|e| DomainError::invalid_input(format!("Invalid Version: {}", e)))?;
        }

        Ok(())
    }

    /// Pull the version with the given id (or alias), optionally scoped to its model
    pub async fn pull(
        ctx: &ComponentContext,
        version_id: Option<&str>,
        model_id: Option<&str>,
        project_id: Option<&str>,
    ) -> Result<Self, DomainError> {
        let version_id = version_id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| DomainError::not_found("Version ID must be provided"))?;

        let version_id = Self::resolve_alias(ctx, version_id, project_id).await?;
        let filters = by_id(&version_id).eq_opt("model_id", model_id);

        debug!(version_id = %version_id, "Pulling model version");
        let row = ctx.versions.query_one(&filters).await?;

        Ok(Self::from_row(row))
    }

    /// Push the (potentially updated) version to the store.
    /// The canonical id returned by the store is written back on success.
    pub async fn push(&mut self, ctx: &ComponentContext) -> Result<(), DomainError> {
        ensure_resolved(self.version_id.as_deref())?;

        let mut row = self.to_row();
        if row.model_id.is_none() {
            if let Some(version_id) = self.version_id.as_deref() {
                row.model_id = ctx.versions.query_one(&by_id(version_id)).await?.model_id;
            }
        }
        let model_id = row.model_id.clone();

        let version_id = ctx.versions.upsert(row).await?;
        debug!(version_id = %version_id, "Pushed model version");
        self.version_id = Some(version_id);
        self.model_id = model_id;

        Ok(())
    }

    /// Delete the version and the aliases pointing at it
    pub async fn delete(&self, ctx: &ComponentContext) -> Result<(), DomainError> {
        ensure_resolved(self.version_id.as_deref())?;

        let version = Self::pull(
            ctx,
            self.version_id.as_deref(),
            self.model_id.as_deref(),
            None,
        )
        .await?;
        let version_id = version
            .version_id
            .clone()
            .ok_or_else(|| DomainError::storage("Model version record is missing its version_id"))?;

        let filters = by_id(&version_id).eq_opt("model_id", version.model_id.as_deref());
        ctx.versions.delete(&filters).await?;

        ctx.aliases.delete_for_component(&version_id).await?;

        info!(version_id = %version_id, "Deleted model version");
        Ok(())
    }
}

fn by_id(version_id: &str) -> Filters {
    Filters::new().eq("version_id", version_id)
}
