use serde::{Deserialize, Serialize};

use super::{decode_timestamp, encode_timestamp, optional, or_empty};
use crate::domain::component::ComponentType;
use crate::domain::{ComponentContext, DomainError, Model, Models};

/// Directory reference carried by a model message
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectoryRef {
    pub directory_id: String,
    #[serde(rename = "type")]
    pub component_type: String,
}

/// Wire form of a model
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelMessage {
    pub model_id: String,
    pub project_id: String,
    pub name: String,
    pub latest_version_id: String,
    pub model_type: String,
    pub sub_model_type: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub directory: Option<DirectoryRef>,
    pub created_at: String,
    pub modified_at: String,
}

impl ModelMessage {
    /// Create a message from a domain model
    pub fn from_domain(model: &Model) -> Self {
        Self {
            model_id: or_empty(model.model_id()),
            project_id: or_empty(model.project_id()),
            name: or_empty(model.name()),
            latest_version_id: or_empty(model.latest_version_id()),
            model_type: or_empty(model.model_type()),
            sub_model_type: or_empty(model.sub_model_type()),
            description: or_empty(model.description()),
            directory: model.directory_id().map(|directory_id| DirectoryRef {
                directory_id: directory_id.to_string(),
                component_type: ComponentType::Model.as_str().to_string(),
            }),
            created_at: encode_timestamp(model.created_at()),
            modified_at: encode_timestamp(model.modified_at()),
        }
    }

    /// Convert to a domain model without touching the store.
    /// Identity, name and type fields read empty as absent; the latest
    /// version, description and directory keep empty strings.
    pub fn decode(self) -> Result<Model, DomainError> {
        let directory_id = match self.directory {
            Some(directory) => {
                let kind = directory.component_type.as_str();
                if !kind.is_empty() && ComponentType::parse(kind) != Some(ComponentType::Model) {
                    return Err(DomainError::invalid_input(
                        "Model cannot be in a different directory type",
                    ));
                }
                Some(directory.directory_id)
            }
            None => None,
        };

        let created_at = decode_timestamp("created_at", &self.created_at)?;
        let modified_at = decode_timestamp("modified_at", &self.modified_at)?;

        let mut model = Model::new();
        model.set_model_id(optional(self.model_id));
        model.set_project_id(optional(self.project_id));
        model.set_name(optional(self.name));
        model.set_latest_version_id(Some(self.latest_version_id));
        model.set_model_type(optional(self.model_type));
        model.set_sub_model_type(optional(self.sub_model_type));
        model.set_description(Some(self.description));
        model.set_directory_id(directory_id);
        model.set_timestamps(created_at, modified_at);

        Ok(model)
    }
}

impl Model {
    pub fn to_wire(&self) -> ModelMessage {
        ModelMessage::from_domain(self)
    }

    /// Build a model from its wire form, resolving aliases against the project
    /// and validating it against the store
    pub async fn from_wire(
        ctx: &ComponentContext,
        message: ModelMessage,
        project_id: Option<&str>,
    ) -> Result<Self, DomainError> {
        let mut model = message.decode()?;

        if model.project_id().is_none() {
            model.set_project_id(project_id.filter(|p| !p.is_empty()).map(str::to_string));
        }
        let project_id = model.project_id().map(str::to_string);

        if let Some(model_id) = model.model_id() {
            let model_id = Self::resolve_alias(ctx, model_id, project_id.as_deref()).await?;
            model.set_model_id(Some(model_id));
        }

        if let Some(directory_id) = model.directory_id() {
            let directory_id =
                Self::resolve_directory_alias(ctx, directory_id, project_id.as_deref()).await?;
            model.set_directory_id(Some(directory_id));
        }

        model.validate(ctx).await?;
        Ok(model)
    }
}

impl Models {
    pub fn to_wire(&self) -> Vec<ModelMessage> {
        self.iter().map(Model::to_wire).collect()
    }

    /// Build every model of a batch, stopping at the first invalid message
    pub async fn from_wire(
        ctx: &ComponentContext,
        messages: Vec<ModelMessage>,
        project_id: Option<&str>,
    ) -> Result<Self, DomainError> {
        let mut models = Vec::with_capacity(messages.len());
        for message in messages {
            models.push(Model::from_wire(ctx, message, project_id).await?);
        }
        Ok(Self::new(models))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::test_support::{model_row, Fixture};
    use crate::domain::ModelRow;
    use tokio_test::{assert_err, assert_ok};

    fn full_row() -> ModelRow {
        ModelRow {
            latest_version_id: Some("v3".to_string()),
            model_type: Some("classification".to_string()),
            sub_model_type: Some("binary".to_string()),
            description: Some("Weekly churn".to_string()),
            directory_id: Some("d1".to_string()),
            modified_at: Some(1_672_600_000),
            ..model_row("m1", "p1", "churn")
        }
    }

    #[test]
    fn test_row_wire_round_trip() {
        let model = Model::from_row(full_row());

        let message = model.to_wire();
        assert_eq!(message.created_at, "1672549140");
        assert_eq!(
            message.directory,
            Some(DirectoryRef {
                directory_id: "d1".to_string(),
                component_type: "model".to_string(),
            })
        );

        let decoded = assert_ok!(message.decode());
        assert_eq!(decoded.to_row(), full_row());
    }

    #[test]
    fn test_absent_fields_encode_as_empty() {
        let message = Model::new().with_name("churn").to_wire();

        assert_eq!(message.model_id, "");
        assert_eq!(message.created_at, "");
        assert!(message.directory.is_none());

        let json = serde_json::to_value(&message).unwrap();
        assert!(json.get("directory").is_none());

        let decoded = message.decode().unwrap();
        assert_eq!(decoded.name(), Some("churn"));
        assert_eq!(decoded.model_id(), None);
        assert_eq!(decoded.model_type(), None);
        assert_eq!(decoded.latest_version_id(), Some(""));
        assert_eq!(decoded.description(), Some(""));
        assert_eq!(decoded.directory_id(), None);
    }

    #[test]
    fn test_round_trip_keeps_empty_strings() {
        let row = ModelRow {
            latest_version_id: Some(String::new()),
            description: Some(String::new()),
            directory_id: Some(String::new()),
            ..model_row("m1", "p1", "churn")
        };

        let decoded = Model::from_row(row.clone()).to_wire().decode().unwrap();
        assert_eq!(decoded.to_row(), row);
    }

    #[test]
    fn test_decode_rejects_bad_input() {
        let message = ModelMessage {
            created_at: "not-a-number".to_string(),
            ..Default::default()
        };
        assert!(assert_err!(message.decode()).is_invalid_input());

        let message = ModelMessage {
            directory: Some(DirectoryRef {
                directory_id: "d1".to_string(),
                component_type: "dataset".to_string(),
            }),
            ..Default::default()
        };
        assert!(assert_err!(message.decode()).is_invalid_input());
    }

    #[test]
    fn test_decode_from_json_with_missing_fields() {
        let message: ModelMessage =
            serde_json::from_str(r#"{"name": "churn", "directory": {"directory_id": "d1"}}"#)
                .unwrap();

        let model = message.decode().unwrap();
        assert_eq!(model.name(), Some("churn"));
        assert_eq!(model.directory_id(), Some("d1"));
        assert_eq!(model.model_id(), None);
    }

    #[tokio::test]
    async fn test_from_wire_resolves_aliases_and_validates() {
        let fixture = Fixture::new()
            .with_model("m1", "p1", "churn")
            .with_directory("d1", "p1", ComponentType::Model)
            .with_alias("p1", "churn", "m1")
            .with_alias("p1", "staging", "d1");
        let ctx = fixture.context();

        let message = ModelMessage {
            model_id: "@churn".to_string(),
            name: "churn-v2".to_string(),
            directory: Some(DirectoryRef {
                directory_id: "@staging".to_string(),
                component_type: "model".to_string(),
            }),
            ..Default::default()
        };

        let model = Model::from_wire(&ctx, message, Some("p1")).await.unwrap();
        assert_eq!(model.model_id(), Some("m1"));
        assert_eq!(model.project_id(), Some("p1"));
        assert_eq!(model.directory_id(), Some("d1"));
    }

    #[tokio::test]
    async fn test_from_wire_propagates_validation_errors() {
        let fixture = Fixture::new()
            .with_model("m1", "p1", "churn")
            .with_model("m2", "p1", "fraud");
        let ctx = fixture.context();

        let messages = vec![
            ModelMessage {
                name: "retention".to_string(),
                ..Default::default()
            },
            ModelMessage {
                name: "fraud".to_string(),
                ..Default::default()
            },
        ];
        let err = Models::from_wire(&ctx, messages, Some("p1")).await.unwrap_err();
        assert_eq!(err.message(), "A model with name fraud already exists");

        let message = ModelMessage {
            model_id: "@churn".to_string(),
            ..Default::default()
        };
        let err = Model::from_wire(&ctx, message, None).await.unwrap_err();
        assert!(err.is_invalid_input());
    }

    #[tokio::test]
    async fn test_models_to_wire() {
        let fixture = Fixture::new()
            .with_model("m1", "p1", "churn")
            .with_model("m2", "p1", "fraud");
        let ctx = fixture.context();

        let models = Models::pull(&ctx, Some("p1"), None).await.unwrap();
        let names: Vec<_> = models.to_wire().into_iter().map(|m| m.name).collect();
        assert_eq!(names, vec!["churn", "fraud"]);
    }
}
