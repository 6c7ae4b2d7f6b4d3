//! Keyword filters for store queries and deletes

use std::fmt;

use serde::Serialize;
use serde_json::Value;

use super::entity::Table;
use crate::domain::DomainError;

/// A single column constraint
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    /// Column equals the value
    Eq { field: &'static str, value: String },
    /// Column equals any of the values
    AnyOf {
        field: &'static str,
        values: Vec<String>,
    },
}

impl Condition {
    pub fn field(&self) -> &'static str {
        match self {
            Self::Eq { field, .. } | Self::AnyOf { field, .. } => field,
        }
    }

    /// Checks the condition against the JSON form of a row
    pub fn matches(&self, document: &Value) -> bool {
        let actual = document.get(self.field()).and_then(Value::as_str);

        match self {
            Self::Eq { value, .. } => actual == Some(value.as_str()),
            Self::AnyOf { values, .. } => {
                actual.is_some_and(|actual| values.iter().any(|v| v == actual))
            }
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Eq { field, value } => write!(f, "{}={}", field, value),
            Self::AnyOf { field, values } => write!(f, "{} in [{}]", field, values.join(", ")),
        }
    }
}

/// Conjunction of column constraints
///
/// Absent values never constrain a query: `eq_opt` and `any_of_opt` skip
/// `None` and empty inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filters {
    conditions: Vec<Condition>,
}

impl Filters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn eq(mut self, field: &'static str, value: impl Into<String>) -> Self {
        self.conditions.push(Condition::Eq {
            field,
            value: value.into(),
        });
        self
    }

    pub fn eq_opt(self, field: &'static str, value: Option<&str>) -> Self {
        match value {
            Some(value) if !value.is_empty() => self.eq(field, value),
            _ => self,
        }
    }

    pub fn any_of_opt(mut self, field: &'static str, values: Option<&[String]>) -> Self {
        if let Some(values) = values.filter(|v| !v.is_empty()) {
            self.conditions.push(Condition::AnyOf {
                field,
                values: values.to_vec(),
            });
        }
        self
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// Returns the value of the first equality constraint on `field`
    pub fn value_of(&self, field: &str) -> Option<&str> {
        self.conditions.iter().find_map(|c| match c {
            Condition::Eq { field: f, value } if *f == field => Some(value.as_str()),
            _ => None,
        })
    }

    pub fn matches(&self, document: &Value) -> bool {
        self.conditions.iter().all(|c| c.matches(document))
    }

    /// Checks the filters against a serializable row
    pub fn matches_record<R: Serialize>(&self, record: &R) -> bool {
        serde_json::to_value(record)
            .map(|document| self.matches(&document))
            .unwrap_or(false)
    }

    /// Deletes must always be keyed; an empty filter set would match the whole table
    pub fn ensure_scoped(&self, table: Table) -> Result<(), DomainError> {
        if self.is_empty() {
            return Err(DomainError::invalid_input(format!(
                "Refusing to delete from {} without filters",
                table
            )));
        }
        Ok(())
    }
}

impl fmt::Display for Filters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.conditions.is_empty() {
            return write!(f, "<all>");
        }

        let rendered: Vec<String> = self.conditions.iter().map(|c| c.to_string()).collect();
        write!(f, "{}", rendered.join(", "))
    }
}
