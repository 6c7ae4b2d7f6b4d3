//! CLI module for the model registry
//!
//! Provides subcommands for operating on the registry metadata:
//! - `migrate`: create the store tables
//! - `models`: list, count, show and delete models
//! - `versions`: list, count, show and delete model versions

pub mod models;
pub mod versions;

use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::info;

use crate::config::AppConfig;
use crate::domain::ComponentContext;
use crate::infrastructure::logging::init_logging;
use crate::infrastructure::storage::{StorageConfig, StorageFactory};

/// Model registry - metadata of models and their versions
#[derive(Parser)]
#[command(name = "model-registry")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Create the store tables
    Migrate,

    /// Operate on models
    #[command(subcommand)]
    Models(models::ModelsCommand),

    /// Operate on model versions
    #[command(subcommand)]
    Versions(versions::VersionsCommand),
}

/// Load configuration, install logging and dispatch the command
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().unwrap_or_default();
    init_logging(&config.logging);

    let storage = StorageConfig::from_settings(&config.storage)?;
    info!(backend = ?storage.storage_type(), "Storage backend selected");

    match cli.command {
        Command::Migrate => {
            StorageFactory::migrate(&storage).await?;
            info!("Store tables ready");
            Ok(())
        }
        Command::Models(command) => {
            let ctx = context(&storage, &config)?;
            models::run(&ctx, command).await
        }
        Command::Versions(command) => {
            let ctx = context(&storage, &config)?;
            versions::run(&ctx, command).await
        }
    }
}

fn context(storage: &StorageConfig, config: &AppConfig) -> anyhow::Result<ComponentContext> {
    Ok(StorageFactory::create_context(storage, &config.blob)?)
}

/// Writes a value to stdout as pretty JSON
fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_models_list() {
        let cli = Cli::try_parse_from([
            "model-registry",
            "models",
            "list",
            "--project",
            "p1",
            "--directory",
            "@staging",
        ])
        .unwrap();

        match cli.command {
            Command::Models(models::ModelsCommand::List { project, directory }) => {
                assert_eq!(project, "p1");
                assert_eq!(directory.as_deref(), Some("@staging"));
            }
            _ => panic!("Expected models list"),
        }
    }

    #[test]
    fn test_parse_versions_requires_model() {
        assert!(Cli::try_parse_from(["model-registry", "versions", "list"]).is_err());

        let cli = Cli::try_parse_from([
            "model-registry",
            "versions",
            "count",
            "--model",
            "m1",
            "--model",
            "@churn",
            "--project",
            "p1",
        ])
        .unwrap();
        match cli.command {
            Command::Versions(versions::VersionsCommand::Count { models, project }) => {
                assert_eq!(models, vec!["m1", "@churn"]);
                assert_eq!(project.as_deref(), Some("p1"));
            }
            _ => panic!("Expected versions count"),
        }
    }
}
