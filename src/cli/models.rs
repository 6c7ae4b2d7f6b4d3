//! `models` subcommands

use clap::Subcommand;
use serde_json::json;

use super::print_json;
use crate::domain::{ComponentContext, Model, Models};

#[derive(Subcommand)]
pub enum ModelsCommand {
    /// List the models of a project
    List {
        #[arg(long)]
        project: String,
        /// Restrict to one directory (id or alias)
        #[arg(long)]
        directory: Option<String>,
    },

    /// Count the models of a project
    Count {
        #[arg(long)]
        project: String,
        #[arg(long)]
        directory: Option<String>,
    },

    /// Show one model
    Show {
        /// Model id or alias
        model: String,
        #[arg(long)]
        project: Option<String>,
    },

    /// Delete a model with its versions, blobs, annotations and aliases
    Delete {
        /// Model id or alias
        model: String,
        #[arg(long)]
        project: Option<String>,
    },
}

pub async fn run(ctx: &ComponentContext, command: ModelsCommand) -> anyhow::Result<()> {
    match command {
        ModelsCommand::List { project, directory } => {
            let models = Models::pull(ctx, Some(project.as_str()), directory.as_deref()).await?;
            print_json(&models.to_wire())
        }
        ModelsCommand::Count { project, directory } => {
            let count = Models::count(ctx, Some(project.as_str()), directory.as_deref()).await?;
            print_json(&json!({ "count": count }))
        }
        ModelsCommand::Show { model, project } => {
            let model = Model::pull(ctx, Some(model.as_str()), project.as_deref()).await?;
            print_json(&model.to_wire())
        }
        ModelsCommand::Delete { model, project } => {
            let model = Model::pull(ctx, Some(model.as_str()), project.as_deref()).await?;
            model.delete(ctx).await?;
            print_json(&json!({ "deleted": model.model_id() }))
        }
    }
}
