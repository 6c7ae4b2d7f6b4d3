//! ModelVersions collection

use tracing::info;

use super::entity::ModelVersion;
use crate::domain::context::ComponentContext;
use crate::domain::storage::Filters;
use crate::domain::DomainError;

/// Ordered collection of versions of one or more models
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModelVersions {
    versions: Vec<ModelVersion>,
}

impl ModelVersions {
    pub fn new(versions: Vec<ModelVersion>) -> Self {
        Self { versions }
    }

    pub fn len(&self) -> usize {
        self.versions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ModelVersion> {
        self.versions.iter()
    }

    pub fn as_slice(&self) -> &[ModelVersion] {
        &self.versions
    }

    /// Pull every version belonging to `model_id` or to any of `model_ids`
    pub async fn pull(
        ctx: &ComponentContext,
        model_id: Option<&str>,
        model_ids: Option<&[String]>,
    ) -> Result<Self, DomainError> {
        let filters = scope_filters(model_id, model_ids)?;
        let rows = ctx.versions.query(&filters).await?;

        Ok(Self::new(rows.into_iter().map(ModelVersion::from_row).collect()))
    }

    /// Count the versions matching the same scope as [`ModelVersions::pull`]
    pub async fn count(
        ctx: &ComponentContext,
        model_id: Option<&str>,
        model_ids: Option<&[String]>,
    ) -> Result<usize, DomainError> {
        let filters = scope_filters(model_id, model_ids)?;
        ctx.versions.count(&filters).await
    }

    /// Delete every version of a model, one by one, stopping at the first failure
    pub async fn delete(ctx: &ComponentContext, model_id: &str) -> Result<(), DomainError> {
        let versions = Self::pull(ctx, Some(model_id), None).await?;

        for version in versions.iter() {
            version.delete(ctx).await?;
        }

        info!(model_id = %model_id, count = versions.len(), "Deleted model versions");
        Ok(())
    }
}

fn scope_filters(model_id: Option<&str>, model_ids: Option<&[String]>) -> Result<Filters, DomainError> {
    let filters = Filters::new()
        .eq_opt("model_id", model_id)
        .any_of_opt("model_id", model_ids);

    if filters.is_empty() {
        return Err(DomainError::invalid_input(
            "At least one model ID must be provided",
        ));
    }

    Ok(filters)
}

impl IntoIterator for ModelVersions {
    type Item = ModelVersion;
    type IntoIter = std::vec::IntoIter<ModelVersion>;

    fn into_iter(self) -> Self::IntoIter {
        self.versions.into_iter()
    }
}

impl<'a> IntoIterator for &'a ModelVersions {
    type Item = &'a ModelVersion;
    type IntoIter = std::slice::Iter<'a, ModelVersion>;

    fn into_iter(self) -> Self::IntoIter {
        self.versions.iter()
    }
}

impl FromIterator<ModelVersion> for ModelVersions {
    fn from_iter<I: IntoIterator<Item = ModelVersion>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
