//! Model version domain - trained versions of a model

mod collection;
mod entity;

pub use collection::ModelVersions;
pub use entity::{Document, ModelVersion, ModelVersionRow};
