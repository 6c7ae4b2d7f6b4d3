//! Component type tags shared by directories, annotations and aliases

use std::fmt;

use serde::{Deserialize, Serialize};

/// Kind of component a directory, annotation or alias refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentType {
    Model,
    ModelVersion,
    Dataset,
    Flow,
    Dashboard,
}

impl ComponentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Model => "model",
            Self::ModelVersion => "model_version",
            Self::Dataset => "dataset",
            Self::Flow => "flow",
            Self::Dashboard => "dashboard",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "model" => Some(Self::Model),
            "model_version" => Some(Self::ModelVersion),
            "dataset" => Some(Self::Dataset),
            "flow" => Some(Self::Flow),
            "dashboard" => Some(Self::Dashboard),
            _ => None,
        }
    }
}

impl fmt::Display for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
