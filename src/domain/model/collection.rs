//! Models collection

use tracing::info;

use super::entity::Model;
use crate::domain::context::ComponentContext;
use crate::domain::storage::Filters;
use crate::domain::DomainError;

/// Ordered collection of the models of a project
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Models {
    models: Vec<Model>,
}

impl Models {
    pub fn new(models: Vec<Model>) -> Self {
        Self { models }
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Model> {
        self.models.iter()
    }

    pub fn as_slice(&self) -> &[Model] {
        &self.models
    }

    /// Pull every model of a project, optionally restricted to one directory
    pub async fn pull(
        ctx: &ComponentContext,
        project_id: Option<&str>,
        directory_id: Option<&str>,
    ) -> Result<Self, DomainError> {
        let filters = scope_filters(ctx, project_id, directory_id).await?;
        let rows = ctx.models.query(&filters).await?;

        Ok(Self::new(rows.into_iter().map(Model::from_row).collect()))
    }

    /// Count the models matching the same scope as [`Models::pull`]
    pub async fn count(
        ctx: &ComponentContext,
        project_id: Option<&str>,
        directory_id: Option<&str>,
    ) -> Result<usize, DomainError> {
        let filters = scope_filters(ctx, project_id, directory_id).await?;
        ctx.models.count(&filters).await
    }

    /// Delete every model in scope, one by one, stopping at the first failure
    pub async fn delete(
        ctx: &ComponentContext,
        project_id: Option<&str>,
        directory_id: Option<&str>,
    ) -> Result<(), DomainError> {
        let models = Self::pull(ctx, project_id, directory_id).await?;

        for model in models.iter() {
            model.delete(ctx).await?;
        }

        info!(
            project_id = project_id.unwrap_or_default(),
            count = models.len(),
            "Deleted models"
        );
        Ok(())
    }
}

async fn scope_filters(
    ctx: &ComponentContext,
    project_id: Option<&str>,
    directory_id: Option<&str>,
) -> Result<Filters, DomainError> {
    let project_id = project_id
        .filter(|p| !p.is_empty())
        .ok_or_else(|| DomainError::invalid_input("At least one project ID must be provided"))?;

    let directory_id = match directory_id.filter(|d| !d.is_empty()) {
        Some(directory_id) => {
            Some(Model::resolve_directory_alias(ctx, directory_id, Some(project_id)).await?)
        }
        None => None,
    };

    Ok(Filters::new()
        .eq("project_id", project_id)
        .eq_opt("directory_id", directory_id.as_deref()))
}

impl IntoIterator for Models {
    type Item = Model;
    type IntoIter = std::vec::IntoIter<Model>;

    fn into_iter(self) -> Self::IntoIter {
        self.models.into_iter()
    }
}

impl<'a> IntoIterator for &'a Models {
    type Item = &'a Model;
    type IntoIter = std::slice::Iter<'a, Model>;

    fn into_iter(self) -> Self::IntoIter {
        self.models.iter()
    }
}

impl FromIterator<Model> for Models {
    fn from_iter<I: IntoIterator<Item = Model>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
