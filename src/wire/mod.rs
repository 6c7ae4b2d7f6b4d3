//! Logical wire messages
//!
//! Messages follow proto3 conventions: every scalar is present, ids and
//! names read empty as absent, and timestamps travel as decimal strings
//! of epoch seconds. Converting an entity to its message is pure; building an
//! entity from a message resolves aliases and validates against the store.

mod model;
mod model_version;

pub use model::{DirectoryRef, ModelMessage};
pub use model_version::ModelVersionMessage;

use crate::domain::DomainError;

/// Empty strings are absent values
fn optional(value: String) -> Option<String> {
    if value.is_empty() { None } else { Some(value) }
}

fn or_empty(value: Option<&str>) -> String {
    value.unwrap_or_default().to_string()
}

fn encode_timestamp(value: Option<i64>) -> String {
    value.map(|ts| ts.to_string()).unwrap_or_default()
}

fn decode_timestamp(field: &str, value: &str) -> Result<Option<i64>, DomainError> {
    if value.is_empty() {
        return Ok(None);
    }

    value.trim().parse::<i64>().map(Some).map_err(|_| {
        DomainError::invalid_input(format!("Invalid {} timestamp '{}'", field, value))
    })
}
