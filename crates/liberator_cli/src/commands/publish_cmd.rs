//! The full pipeline: load, rewrite, and publish a project.

use std::path::PathBuf;

use clap::Args;
use liberation_core::{liberate_and_publish, PublishRequest, PublishResult, RepoDestination};
use tracing::info;

use crate::config::AppConfig;
use crate::errors::Error;
use crate::loader;

#[cfg(test)]
#[path = "publish_cmd_tests.rs"]
mod tests;

/// Arguments for the `publish` command.
#[derive(Args, Debug)]
pub struct PublishArgs {
    /// Path to the project directory
    pub path: PathBuf,

    /// Destination repository as owner/repo
    #[arg(long)]
    pub dest: Option<String>,

    /// Project display name (defaults to the directory name)
    #[arg(long)]
    pub name: Option<String>,

    /// Commit message override
    #[arg(long)]
    pub message: Option<String>,

    /// Write-capable token; falls back to the GITHUB_TOKEN environment variable
    #[arg(long)]
    pub token: Option<String>,
}

pub async fn execute(args: &PublishArgs) -> Result<PublishResult, Error> {
    let config = AppConfig::load_for_project(&args.path)?;
    let request = build_request(args, &config)?;

    let token = match args.token.clone().or_else(|| std::env::var("GITHUB_TOKEN").ok()) {
        Some(token) if !token.is_empty() => token,
        _ => {
            return Err(Error::Auth(
                "no token supplied; pass --token or set GITHUB_TOKEN".to_string(),
            ))
        }
    };

    info!(
        project = request.project_name,
        destination = %request.destination,
        files = request.files.len(),
        "publishing project"
    );

    Ok(liberate_and_publish(&request, &token).await)
}

/// Merges flags over config-file defaults into a publish request.
fn build_request(args: &PublishArgs, config: &AppConfig) -> Result<PublishRequest, Error> {
    let destination = args
        .dest
        .clone()
        .or_else(|| config.destination.clone())
        .ok_or_else(|| {
            Error::InvalidArguments(
                "no destination supplied; pass --dest owner/repo or set it in liberator.toml"
                    .to_string(),
            )
        })?;
    let destination: RepoDestination = destination
        .parse()
        .map_err(|e: liberation_core::Error| Error::InvalidArguments(e.to_string()))?;

    let project_name = args
        .name
        .clone()
        .or_else(|| config.project_name.clone())
        .or_else(|| {
            args.path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
        })
        .unwrap_or_else(|| destination.repo_name.clone());

    let files = loader::load_project(&args.path)?;

    Ok(PublishRequest {
        project_name,
        destination,
        files,
        commit_message: args.message.clone().or_else(|| config.commit_message.clone()),
    })
}
