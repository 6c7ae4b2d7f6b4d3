use serde::{Deserialize, Serialize};

use super::{decode_timestamp, encode_timestamp, optional, or_empty};
use crate::domain::{
    resolve_alias, ComponentContext, Document, DomainError, ModelVersion, ModelVersions,
};

/// Wire form of a model version
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelVersionMessage {
    pub version_id: String,
    pub model_id: String,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hyperparameters: Option<Document>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metrics: Option<Document>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fold_metrics: Option<Document>,
    pub created_at: String,
    pub modified_at: String,
}

impl ModelVersionMessage {
    /// Create a message from a domain model version
    pub fn from_domain(version: &ModelVersion) -> Self {
        Self {
            version_id: or_empty(version.version_id()),
            model_id: or_empty(version.model_id()),
            version: or_empty(version.version()),
            hyperparameters: version.hyperparameters().cloned(),
            metrics: version.metrics().cloned(),
            fold_metrics: version.fold_metrics().cloned(),
            created_at: encode_timestamp(version.created_at()),
            modified_at: encode_timestamp(version.modified_at()),
        }
    }

    /// Convert to a domain model version without touching the store
    pub fn decode(self) -> Result<ModelVersion, DomainError> {
        let created_at = decode_timestamp("created_at", &self.created_at)?;
        let modified_at = decode_timestamp("modified_at", &self.modified_at)?;

        let mut version = ModelVersion::new();
        version.set_version_id(optional(self.version_id));
        version.set_model_id(optional(self.model_id));
        version.set_version(optional(self.version));
        version.set_hyperparameters(self.hyperparameters);
        version.set_metrics(self.metrics);
        version.set_fold_metrics(self.fold_metrics);
        version.set_timestamps(created_at, modified_at);

        Ok(version)
    }
}

impl ModelVersion {
    pub fn to_wire(&self) -> ModelVersionMessage {
        ModelVersionMessage::from_domain(self)
    }

    /// Build a version from its wire form. The parent model falls back to
    /// `model_id` when the message carries none; aliases resolve within `project_id`.
    pub async fn from_wire(
        ctx: &ComponentContext,
        message: ModelVersionMessage,
        model_id: Option<&str>,
        project_id: Option<&str>,
    ) -> Result<Self, DomainError> {
        let mut version = message.decode()?;

        if version.model_id().is_none() {
            version.set_model_id(model_id.filter(|m| !m.is_empty()).map(str::to_string));
        }

        if let Some(model_id) = version.model_id() {
            let model_id = resolve_alias(ctx.aliases.as_ref(), model_id, project_id).await?;
            version.set_model_id(Some(model_id));
        }

        if let Some(version_id) = version.version_id() {
            let version_id = Self::resolve_alias(ctx, version_id, project_id).await?;
            version.set_version_id(Some(version_id));
        }

        version.validate(ctx).await?;
        Ok(version)
    }
}

impl ModelVersions {
    pub fn to_wire(&self) -> Vec<ModelVersionMessage> {
        self.iter().map(ModelVersion::to_wire).collect()
    }
}
