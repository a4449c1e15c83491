///
/// This module implements the CLI interface for release-sync: command parsing, the async
/// entrypoint, and the glue between loaded inputs, the GitHub client and the core pipeline.
///
/// All release logic (lookup, create/update, asset upload) lives in `release-sync-core`.
///
/// ## How To Use
/// - In CI: run `release-sync publish` with `INPUT_*`, `GITHUB_TOKEN`, `GITHUB_REPOSITORY`
///   and `GITHUB_SHA` in the environment.
/// - Locally: pass `--inputs inputs.yaml` with the same input names.
/// - Programmatically: call [`run`] with a constructed [`Cli`].
use crate::github::GitHubClient;
use crate::load_config::load_config;
use crate::outputs::write_outputs_from_env;
use anyhow::Result;
use clap::{Parser, Subcommand};
use release_sync_core::config::LookupStrategy;
use release_sync_core::publish::publish;
use std::path::PathBuf;

/// CLI for release-sync: create or update a release and upload its assets.
#[derive(Parser)]
#[clap(
    name = "release-sync",
    version,
    about = "Create or update a release for a tag and upload a directory of assets to it"
)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Publish the release described by the step inputs
    Publish {
        /// Optional YAML file with step inputs; INPUT_* environment variables override it
        #[clap(long)]
        inputs: Option<PathBuf>,

        /// How to find an existing release: "draft" (first open draft) or "tag"
        #[clap(long)]
        lookup: Option<LookupStrategy>,
    },
}

/// Extracted async CLI logic entrypoint for integration tests and main()
pub async fn run(cli: Cli) -> Result<()> {
    // Emit a top-level 'trace_initialised' event at the very start
    tracing::info!("trace_initialised");

    match cli.command {
        Commands::Publish { inputs, lookup } => {
            let config = load_config(inputs.as_deref(), lookup)?;
            tracing::info!(command = "publish", tag = %config.request.tag, "Starting release publish");

            let client = GitHubClient::new_from_env().map_err(anyhow::Error::msg)?;

            match publish(&client, &config.request, config.strategy).await {
                Ok(report) => {
                    tracing::info!(
                        command = "publish",
                        release_id = report.release_id,
                        is_new = report.is_new,
                        assets = report.assets.len(),
                        "Release published"
                    );
                    write_outputs_from_env(&report)?;
                    Ok(())
                }
                Err(e) => {
                    tracing::error!(command = "publish", error = %e, "Release publish failed");
                    Err(e.into())
                }
            }
        }
    }
}
