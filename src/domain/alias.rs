//! Project-scoped aliases
//!
//! An alias is a human-assignable token (`@name`) that resolves, within a
//! project, to the canonical id of a component. Ids accepted from outside the
//! registry go through [`resolve_alias`] before they are compared or persisted.

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use serde::{Deserialize, Serialize};

use crate::domain::storage::{StorageRecord, Table};
use crate::domain::DomainError;

/// Prefix marking an id as an alias token
pub const ALIAS_PREFIX: char = '@';

/// Returns true when the id is an alias token rather than a canonical id
pub fn is_alias(id: &str) -> bool {
    id.len() > ALIAS_PREFIX.len_utf8() && id.starts_with(ALIAS_PREFIX)
}

/// Same as [`is_alias`] for optional ids
pub fn is_alias_opt(id: Option<&str>) -> bool {
    id.is_some_and(is_alias)
}

/// Strips the alias prefix, returning the bare alias name
pub fn alias_name(alias: &str) -> &str {
    alias.strip_prefix(ALIAS_PREFIX).unwrap_or(alias)
}

/// Row of the project alias table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AliasRow {
    pub alias_id: Option<String>,
    pub project_id: String,
    /// Bare alias name, without the prefix
    pub alias: String,
    pub component_id: String,
}

impl AliasRow {
    pub fn new(
        project_id: impl Into<String>,
        alias: impl Into<String>,
        component_id: impl Into<String>,
    ) -> Self {
        Self {
            alias_id: None,
            project_id: project_id.into(),
            alias: alias.into(),
            component_id: component_id.into(),
        }
    }
}

impl StorageRecord for AliasRow {
    const TABLE: Table = Table::ProjectAlias;

    fn id(&self) -> Option<&str> {
        self.alias_id.as_deref()
    }

    fn set_id(&mut self, id: String) {
        self.alias_id = Some(id);
    }
}

/// Alias resolution collaborator
#[cfg_attr(test, automock)]
#[async_trait]
pub trait AliasResolver: Send + Sync {
    /// Maps an alias token to the canonical id it points at within the project
    async fn resolve_to_component_id(
        &self,
        alias: &str,
        project_id: &str,
    ) -> Result<String, DomainError>;

    /// Removes every alias pointing at the component
    async fn delete_for_component(&self, component_id: &str) -> Result<(), DomainError>;
}

/// Converts an alias back to its canonical id, if necessary
///
/// Canonical ids are returned unchanged without touching the resolver.
pub async fn resolve_alias(
    resolver: &dyn AliasResolver,
    id: &str,
    project_id: Option<&str>,
) -> Result<String, DomainError> {
    if !is_alias(id) {
        return Ok(id.to_string());
    }

    let project_id = project_id
        .filter(|p| !p.is_empty())
        .ok_or_else(|| DomainError::invalid_input("Project must be provided with an alias"))?;

    resolver.resolve_to_component_id(id, project_id).await
}

/// Fails when an id that is about to be used for a mutation is still an alias
pub fn ensure_resolved(id: Option<&str>) -> Result<(), DomainError> {
    if is_alias_opt(id) {
        return Err(DomainError::invalid_input("Resolve the alias before usage"));
    }
    Ok(())
}
