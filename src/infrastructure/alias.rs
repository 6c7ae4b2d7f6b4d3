//! Alias resolver backed by the project alias table

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::domain::alias::{alias_name, AliasResolver, AliasRow};
use crate::domain::storage::{Filters, Storage};
use crate::domain::DomainError;

/// Resolves aliases by looking them up in the alias table
#[derive(Debug, Clone)]
pub struct StoreAliasResolver {
    aliases: Arc<dyn Storage<AliasRow>>,
}

impl StoreAliasResolver {
    pub fn new(aliases: Arc<dyn Storage<AliasRow>>) -> Self {
        Self { aliases }
    }

    /// Registers an alias for a component within a project
    pub async fn register(
        &self,
        project_id: &str,
        alias: &str,
        component_id: &str,
    ) -> Result<String, DomainError> {
        self.aliases
            .upsert(AliasRow::new(project_id, alias_name(alias), component_id))
            .await
    }
}

#[async_trait]
impl AliasResolver for StoreAliasResolver {
    async fn resolve_to_component_id(
        &self,
        alias: &str,
        project_id: &str,
    ) -> Result<String, DomainError> {
        let filters = Filters::new()
            .eq("alias", alias_name(alias))
            .eq("project_id", project_id);

        let row = self.aliases.query_one(&filters).await.map_err(|e| {
            if e.is_not_found() {
                DomainError::not_found(format!("No alias {} in project {}", alias, project_id))
            } else {
                e
            }
        })?;

        debug!(alias = %alias, component_id = %row.component_id, "Resolved alias");
        Ok(row.component_id)
    }

    async fn delete_for_component(&self, component_id: &str) -> Result<(), DomainError> {
        let removed = self
            .aliases
            .delete(&Filters::new().eq("component_id", component_id))
            .await?;

        debug!(component_id = %component_id, removed, "Deleted aliases");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::storage::InMemoryStorage;

    fn resolver() -> (StoreAliasResolver, Arc<InMemoryStorage<AliasRow>>) {
        let table = Arc::new(InMemoryStorage::with_rows(vec![
            AliasRow::new("p1", "churn", "m1"),
            AliasRow::new("p2", "churn", "m9"),
            AliasRow::new("p1", "prod", "v1"),
        ]));
        (StoreAliasResolver::new(table.clone()), table)
    }

    #[tokio::test]
    async fn test_resolve_within_project() {
        let (resolver, _) = resolver();

        let id = resolver
            .resolve_to_component_id("@churn", "p1")
            .await
            .unwrap();
        assert_eq!(id, "m1");

        let id = resolver
            .resolve_to_component_id("@churn", "p2")
            .await
            .unwrap();
        assert_eq!(id, "m9");
    }

    #[tokio::test]
    async fn test_unknown_alias_is_not_found() {
        let (resolver, _) = resolver();

        let err = resolver
            .resolve_to_component_id("@missing", "p1")
            .await
            .unwrap_err();
        assert!(err.is_not_found());
        assert!(err.message().contains("@missing"));
    }

    #[tokio::test]
    async fn test_delete_for_component() {
        let (resolver, table) = resolver();

        resolver.delete_for_component("m1").await.unwrap();
        resolver.delete_for_component("m1").await.unwrap();

        assert_eq!(table.count(&Filters::new()).await.unwrap(), 2);
        assert!(resolver
            .resolve_to_component_id("@churn", "p1")
            .await
            .unwrap_err()
            .is_not_found());
    }

    #[tokio::test]
    async fn test_register() {
        let (resolver, _) = resolver();

        resolver.register("p3", "@best", "m3").await.unwrap();
        let id = resolver.resolve_to_component_id("@best", "p3").await.unwrap();
        assert_eq!(id, "m3");
    }
}
