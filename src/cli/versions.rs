//! `versions` subcommands

use clap::Subcommand;
use serde_json::json;

use super::print_json;
use crate::domain::{ComponentContext, Model, ModelVersion, ModelVersions};

#[derive(Subcommand)]
pub enum VersionsCommand {
    /// List the versions of one or more models
    List {
        /// Model ids or aliases
        #[arg(long = "model", required = true)]
        models: Vec<String>,
        #[arg(long)]
        project: Option<String>,
    },

    /// Count the versions of one or more models
    Count {
        #[arg(long = "model", required = true)]
        models: Vec<String>,
        #[arg(long)]
        project: Option<String>,
    },

    /// Show one version
    Show {
        /// Version id or alias
        version: String,
        #[arg(long)]
        model: Option<String>,
        #[arg(long)]
        project: Option<String>,
    },

    /// Delete a version and its aliases
    Delete {
        version: String,
        #[arg(long)]
        model: Option<String>,
        #[arg(long)]
        project: Option<String>,
    },
}

pub async fn run(ctx: &ComponentContext, command: VersionsCommand) -> anyhow::Result<()> {
    match command {
        VersionsCommand::List { models, project } => {
            let model_ids = resolve_models(ctx, &models, project.as_deref()).await?;
            let versions = ModelVersions::pull(ctx, None, Some(model_ids.as_slice())).await?;
            print_json(&versions.to_wire())
        }
        VersionsCommand::Count { models, project } => {
            let model_ids = resolve_models(ctx, &models, project.as_deref()).await?;
            let count = ModelVersions::count(ctx, None, Some(model_ids.as_slice())).await?;
            print_json(&json!({ "count": count }))
        }
        VersionsCommand::Show {
            version,
            model,
            project,
        } => {
            let version = pull(ctx, &version, model.as_deref(), project.as_deref()).await?;
            print_json(&version.to_wire())
        }
        VersionsCommand::Delete {
            version,
            model,
            project,
        } => {
            let version = pull(ctx, &version, model.as_deref(), project.as_deref()).await?;
            version.delete(ctx).await?;
            print_json(&json!({ "deleted": version.version_id() }))
        }
    }
}

async fn resolve_models(
    ctx: &ComponentContext,
    models: &[String],
    project: Option<&str>,
) -> anyhow::Result<Vec<String>> {
    let mut model_ids = Vec::with_capacity(models.len());
    for model in models {
        model_ids.push(Model::resolve_alias(ctx, model, project).await?);
    }
    Ok(model_ids)
}

async fn pull(
    ctx: &ComponentContext,
    version: &str,
    model: Option<&str>,
    project: Option<&str>,
) -> anyhow::Result<ModelVersion> {
    let model_id = match model {
        Some(model) => Some(Model::resolve_alias(ctx, model, project).await?),
        None => None,
    };
    Ok(ModelVersion::pull(ctx, Some(version), model_id.as_deref(), project).await?)
}
