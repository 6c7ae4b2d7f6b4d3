//! Annotation rows

use serde::{Deserialize, Serialize};

use crate::domain::component::ComponentType;
use crate::domain::storage::{Filters, StorageRecord, Table};

/// Row of the annotation table, a free-form note attached to a component
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotationRow {
    pub annotation_id: Option<String>,
    pub component_type: ComponentType,
    pub component_id: String,
    pub content: Option<String>,
}

impl AnnotationRow {
    pub fn new(component_type: ComponentType, component_id: impl Into<String>) -> Self {
        Self {
            annotation_id: None,
            component_type,
            component_id: component_id.into(),
            content: None,
        }
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }
}

impl StorageRecord for AnnotationRow {
    const TABLE: Table = Table::Annotation;

    fn id(&self) -> Option<&str> {
        self.annotation_id.as_deref()
    }

    fn set_id(&mut self, id: String) {
        self.annotation_id = Some(id);
    }
}

/// Filters selecting every annotation of one component
pub fn annotation_filters(component_type: ComponentType, component_id: &str) -> Filters {
    Filters::new()
        .eq("component_type", component_type.as_str())
        .eq("component_id", component_id)
}
