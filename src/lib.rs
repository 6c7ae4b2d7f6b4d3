//! Model registry
//!
//! Metadata layer for machine-learning models and their versions:
//! - Project-scoped alias resolution
//! - Validation of ownership, name uniqueness and directory placement
//! - Push, pull and cascading delete against a typed store gateway
//! - Logical wire messages for models and versions

pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod wire;

pub use config::AppConfig;
pub use domain::{ComponentContext, DomainError, Model, ModelVersion, ModelVersions, Models};
pub use wire::{ModelMessage, ModelVersionMessage};
