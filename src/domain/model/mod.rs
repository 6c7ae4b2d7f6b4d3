//! Model domain - models and their collections

mod collection;
mod entity;

pub use collection::Models;
pub use entity::{Model, ModelRow};
