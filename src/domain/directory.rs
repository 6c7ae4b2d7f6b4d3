//! Directory rows

use serde::{Deserialize, Serialize};

use crate::domain::component::ComponentType;
use crate::domain::storage::{Filters, StorageRecord, Table};

/// Row of the directory table. A directory groups components of one type
/// inside a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectoryRow {
    pub directory_id: Option<String>,
    pub project_id: String,
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub component_type: ComponentType,
}

impl DirectoryRow {
    pub fn new(project_id: impl Into<String>, component_type: ComponentType) -> Self {
        Self {
            directory_id: None,
            project_id: project_id.into(),
            name: None,
            component_type,
        }
    }

    pub fn with_id(mut self, directory_id: impl Into<String>) -> Self {
        self.directory_id = Some(directory_id.into());
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

impl StorageRecord for DirectoryRow {
    const TABLE: Table = Table::Directory;

    fn id(&self) -> Option<&str> {
        self.directory_id.as_deref()
    }

    fn set_id(&mut self, id: String) {
        self.directory_id = Some(id);
    }
}

/// Filters selecting a directory of a given type inside a project
pub fn directory_filters(
    directory_id: &str,
    project_id: Option<&str>,
    component_type: Option<ComponentType>,
) -> Filters {
    Filters::new()
        .eq("directory_id", directory_id)
        .eq_opt("project_id", project_id)
        .eq_opt("type", component_type.map(|t| t.as_str()))
}
