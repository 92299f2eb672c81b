//! # Liberation Core
//!
//! This crate provides the core orchestration logic for RepoLiberator, a
//! tool that takes a web-application project depending on proprietary
//! hosted services and publishes a functionally equivalent project that
//! depends only on self-hostable open-source substitutes.
//!
//! ## Overview
//!
//! One publish runs as a single sequential pass:
//! 1. Scan and rewrite the project file set ([`pattern_engine`])
//! 2. Resolve repository and branch preconditions ([`resolver`])
//! 3. Build the commit tree, uploading oversized blobs first ([`tree`])
//! 4. Create the commit and move the branch ref ([`publisher`])
//!
//! The only concurrency is the bounded blob-upload fan-out inside the tree
//! stage; every stage's input is the previous stage's output sha, so the
//! stages themselves are strictly ordered. The pipeline holds no state
//! after a publish: the returned [`PublishResult`] is the terminal value.
//!
//! ## Architecture
//!
//! The crate follows a dependency injection pattern for testability: every
//! stage takes a [`RepositoryHost`] trait object, and the production
//! implementation is [`github_client::GitHubClient`].
//!
//! ## Error Handling
//!
//! Internal stages use the typed [`Error`] taxonomy; the top-level
//! [`publish_project`] folds it into a [`PublishResult`]. Callers must
//! treat any failure as "nothing was published", even though orphaned
//! objects may transiently exist on the host.

use std::str::FromStr;

use github_client::{create_token_client, GitHubClient, RepositoryHost};
use pattern_engine::{FileRecord, ScanOutcome};
use tracing::{error, info};
use url::Url;

mod errors;
pub use errors::Error;

pub mod resolver;
pub use resolver::{resolve, RepoState};

pub mod tree;
pub use tree::{build_tree, MAX_INLINE_BYTES};

pub mod publisher;
pub use publisher::publish_commit;

#[cfg(test)]
pub(crate) mod test_support;

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;

/// Where to publish: `owner/repository` on the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoDestination {
    pub owner: String,
    pub repo_name: String,
}

impl FromStr for RepoDestination {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split('/');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(owner), Some(repo), None) if !owner.is_empty() && !repo.is_empty() => {
                Ok(Self {
                    owner: owner.to_string(),
                    repo_name: repo.to_string(),
                })
            }
            _ => Err(Error::InvalidDestination(s.to_string())),
        }
    }
}

impl std::fmt::Display for RepoDestination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo_name)
    }
}

/// Request for publishing a liberated project.
#[derive(Debug, Clone)]
pub struct PublishRequest {
    /// Display name used in the commit message.
    pub project_name: String,
    /// Destination repository.
    pub destination: RepoDestination,
    /// The project's files: relative path plus raw content.
    pub files: Vec<FileRecord>,
    /// Commit message override; a default is derived from `project_name`.
    pub commit_message: Option<String>,
}

/// Everything a successful publish produced.
#[derive(Debug)]
pub struct PublishOutcome {
    pub repo_url: Url,
    pub commit_sha: String,
    pub files_published: usize,
    /// The scan report: substitutions made and files dropped.
    pub scan: ScanOutcome,
}

/// Terminal result of a publish attempt.
pub struct PublishResult {
    pub success: bool,
    pub repo_url: Option<Url>,
    pub commit_sha: Option<String>,
    pub files_published: usize,
    pub message: String,
}

impl PublishResult {
    pub fn succeeded(outcome: &PublishOutcome, message: impl Into<String>) -> Self {
        Self {
            success: true,
            repo_url: Some(outcome.repo_url.clone()),
            commit_sha: Some(outcome.commit_sha.clone()),
            files_published: outcome.files_published,
            message: message.into(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            repo_url: None,
            commit_sha: None,
            files_published: 0,
            message: message.into(),
        }
    }
}

/// Runs the full pipeline against a host, returning typed errors.
///
/// The scan runs before any host call, so a project with nothing to publish
/// never touches the network.
pub async fn try_publish(
    host: &dyn RepositoryHost,
    request: &PublishRequest,
) -> Result<PublishOutcome, Error> {
    let scan = pattern_engine::scan(&request.files)?;

    info!(
        project = request.project_name,
        destination = %request.destination,
        files = scan.cleaned.len(),
        substitutions = scan.total_changes,
        "starting publish"
    );

    let state = resolver::resolve(
        host,
        &request.destination.owner,
        &request.destination.repo_name,
    )
    .await?;

    let tree_sha = tree::build_tree(host, &state, &scan.cleaned).await?;

    let message = request.commit_message.clone().unwrap_or_else(|| {
        format!(
            "Liberate {}: replace proprietary services with open-source equivalents",
            request.project_name
        )
    });

    let commit_sha = publisher::publish_commit(host, &state, &tree_sha, &message).await?;

    Ok(PublishOutcome {
        repo_url: state.url(),
        commit_sha,
        files_published: scan.cleaned.len(),
        scan,
    })
}

/// Runs the full pipeline and folds the outcome into a [`PublishResult`].
pub async fn publish_project(
    host: &dyn RepositoryHost,
    request: &PublishRequest,
) -> PublishResult {
    match try_publish(host, request).await {
        Ok(outcome) => {
            let message = format!(
                "Published {} files ({} substitutions) to {}",
                outcome.files_published, outcome.scan.total_changes, outcome.repo_url
            );
            info!(commit = outcome.commit_sha, "{message}");
            PublishResult::succeeded(&outcome, message)
        }
        Err(e) => {
            error!(error = %e, "publish failed");
            PublishResult::failed(e.to_string())
        }
    }
}

/// Convenience entry point: builds a token-authenticated GitHub client and
/// publishes through it.
///
/// The token is an opaque string handed through to the client; it is never
/// validated or refreshed here.
pub async fn liberate_and_publish(request: &PublishRequest, token: &str) -> PublishResult {
    let octocrab = match create_token_client(token) {
        Ok(client) => client,
        Err(e) => return PublishResult::failed(format!("could not build host client: {e}")),
    };
    let client = GitHubClient::new(octocrab);
    publish_project(&client, request).await
}
