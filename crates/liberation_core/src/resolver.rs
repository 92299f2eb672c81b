//! Repository and branch precondition resolution.
//!
//! Before any object can be published the pipeline needs to know: does the
//! destination repository exist, which branch holds history, and what are
//! the base commit and tree of that branch. This module answers those
//! questions once per publish, creating and bootstrapping the repository on
//! the way when needed. The result is never cached across publishes; branch
//! heads are externally mutable.

use std::time::Duration;

use github_client::{CreateFilePayload, RepositoryCreatePayload, RepositoryHost};
use tracing::{debug, info, warn};

use crate::errors::Error;

#[cfg(test)]
#[path = "resolver_tests.rs"]
mod tests;

/// The conventional primary branch name used for bootstrap.
pub const PRIMARY_BRANCH: &str = "main";

/// Legacy branch name tried when the primary name is rejected.
pub const LEGACY_BRANCH: &str = "master";

/// File written by the bootstrap commit.
const BOOTSTRAP_FILE: &str = "README.md";

/// How long to wait for the host to converge after bootstrap before
/// re-reading the branch ref.
const CONVERGENCE_DELAY: Duration = Duration::from_millis(1500);

/// Branch preconditions for one publish operation.
///
/// `base_commit_sha` and `base_tree_sha` are `None` only when the target
/// branch has no confirmed history, which routes the tree builder onto the
/// root-tree path and the publisher onto ref creation.
#[derive(Debug, Clone)]
pub struct RepoState {
    pub owner: String,
    pub repo_name: String,
    pub branch: String,
    pub base_commit_sha: Option<String>,
    pub base_tree_sha: Option<String>,
    pub created: bool,
}

impl RepoState {
    /// Web URL of the repository.
    ///
    /// # Panics
    ///
    /// Panics if owner and repository name cannot be formatted into a valid
    /// URL. This should not happen with names the host accepted.
    pub fn url(&self) -> url::Url {
        url::Url::parse(&format!(
            "https://github.com/{}/{}",
            self.owner, self.repo_name
        ))
        .expect("Valid repository URL")
    }
}

/// Resolves the destination repository, creating and bootstrapping it when
/// needed.
///
/// State machine: check existence, create when absent (private, without
/// auto-initialization, which would race the explicit bootstrap), read the
/// default branch head, and bootstrap an initial commit when the branch has
/// no history. Only the post-bootstrap re-read is ever retried; auth and
/// rate-limit failures propagate immediately.
pub async fn resolve(
    host: &dyn RepositoryHost,
    owner: &str,
    repo_name: &str,
) -> Result<RepoState, Error> {
    let (repository, created) = find_or_create_repository(host, owner, repo_name).await?;

    let branch = repository
        .default_branch()
        .unwrap_or(PRIMARY_BRANCH)
        .to_string();

    debug!(
        owner = owner,
        repo = repo_name,
        branch = branch,
        created = created,
        "resolving branch head"
    );

    if !created {
        if let Some((commit_sha, tree_sha)) = read_branch_head(host, owner, repo_name, &branch).await? {
            info!(
                owner = owner,
                repo = repo_name,
                branch = branch,
                base_commit = commit_sha,
                "resolved existing branch head"
            );
            return Ok(RepoState {
                owner: owner.to_string(),
                repo_name: repo_name.to_string(),
                branch,
                base_commit_sha: Some(commit_sha),
                base_tree_sha: Some(tree_sha),
                created,
            });
        }
    }

    // Repository is brand new, or it exists but the branch has no commits.
    let branch = bootstrap(host, owner, repo_name, &branch).await?;
    let head = confirm_bootstrap(host, owner, repo_name, &branch).await?;

    let (base_commit_sha, base_tree_sha) = match head {
        Some((commit_sha, tree_sha)) => (Some(commit_sha), Some(tree_sha)),
        None => {
            warn!(
                owner = owner,
                repo = repo_name,
                branch = branch,
                "bootstrap not confirmed; proceeding with a root tree"
            );
            (None, None)
        }
    };

    Ok(RepoState {
        owner: owner.to_string(),
        repo_name: repo_name.to_string(),
        branch,
        base_commit_sha,
        base_tree_sha,
        created,
    })
}

/// Reads repository metadata, creating the repository when it does not
/// exist. Returns the metadata and whether this call created it.
async fn find_or_create_repository(
    host: &dyn RepositoryHost,
    owner: &str,
    repo_name: &str,
) -> Result<(github_client::models::Repository, bool), Error> {
    match host.get_repository(owner, repo_name).await {
        Ok(repository) => Ok((repository, false)),
        Err(github_client::Error::NotFound) => {
            info!(owner = owner, repo = repo_name, "repository not found, creating");
            let payload = RepositoryCreatePayload {
                name: repo_name.to_string(),
                description: Some("Liberated from proprietary services".to_string()),
                private: Some(true),
                auto_init: false,
            };
            match host.create_user_repository(&payload).await {
                Ok(repository) => Ok((repository, true)),
                Err(error) if error.is_already_exists() => {
                    // Lost a creation race; the repository is there now.
                    let repository = host
                        .get_repository(owner, repo_name)
                        .await
                        .map_err(|e| Error::from_host("repository lookup", e))?;
                    Ok((repository, false))
                }
                Err(error) => Err(Error::from_host("repository creation", error)),
            }
        }
        Err(error) => Err(Error::from_host("repository lookup", error)),
    }
}

/// Reads a branch head and the tree of its commit.
///
/// Returns `None` when the branch has no commits.
async fn read_branch_head(
    host: &dyn RepositoryHost,
    owner: &str,
    repo_name: &str,
    branch: &str,
) -> Result<Option<(String, String)>, Error> {
    let git_ref = match host.get_branch_ref(owner, repo_name, branch).await {
        Ok(git_ref) => git_ref,
        Err(github_client::Error::NotFound) => return Ok(None),
        Err(error) => return Err(Error::from_host("branch resolution", error)),
    };

    let commit = host
        .get_commit(owner, repo_name, &git_ref.object.sha)
        .await
        .map_err(|e| Error::from_host("branch resolution", e))?;

    Ok(Some((commit.sha, commit.tree.sha)))
}

/// Creates the initial commit on an empty repository through the contents
/// API, falling back to the legacy branch name if the primary is rejected.
///
/// Returns the branch name that actually took the commit. An already-exists
/// response counts as success so a second resolve against the same
/// repository is harmless.
async fn bootstrap(
    host: &dyn RepositoryHost,
    owner: &str,
    repo_name: &str,
    branch: &str,
) -> Result<String, Error> {
    match write_bootstrap_file(host, owner, repo_name, branch).await {
        Ok(()) => return Ok(branch.to_string()),
        Err(Error::Host { source, .. }) if source.is_already_exists() => {
            debug!(branch = branch, "bootstrap commit already present");
            return Ok(branch.to_string());
        }
        Err(error @ (Error::Auth(_) | Error::RateLimit { .. })) => return Err(error),
        Err(error) => {
            if branch == LEGACY_BRANCH {
                return Err(error);
            }
            warn!(
                branch = branch,
                "bootstrap rejected on primary branch name, retrying with legacy name"
            );
        }
    }

    match write_bootstrap_file(host, owner, repo_name, LEGACY_BRANCH).await {
        Ok(()) => Ok(LEGACY_BRANCH.to_string()),
        Err(Error::Host { source, .. }) if source.is_already_exists() => {
            Ok(LEGACY_BRANCH.to_string())
        }
        Err(error @ (Error::Auth(_) | Error::RateLimit { .. })) => Err(error),
        Err(_) => Err(Error::BranchUnresolved {
            owner: owner.to_string(),
            repo: repo_name.to_string(),
        }),
    }
}

async fn write_bootstrap_file(
    host: &dyn RepositoryHost,
    owner: &str,
    repo_name: &str,
    branch: &str,
) -> Result<(), Error> {
    let readme = format!(
        "# {repo_name}\n\nThis repository was produced by RepoLiberator.\n"
    );
    let payload = CreateFilePayload::new(
        "Initial commit",
        readme.as_bytes(),
        Some(branch.to_string()),
    );
    host.create_file(owner, repo_name, BOOTSTRAP_FILE, &payload)
        .await
        .map_err(|e| Error::from_host("bootstrap", e))
}

/// Re-reads the branch head once after bootstrap, absorbing host-side
/// eventual consistency.
///
/// A transient failure of this re-read is retried exactly once after the
/// same fixed delay; a clean miss after that leaves the caller on the
/// root-tree path.
async fn confirm_bootstrap(
    host: &dyn RepositoryHost,
    owner: &str,
    repo_name: &str,
    branch: &str,
) -> Result<Option<(String, String)>, Error> {
    tokio::time::sleep(CONVERGENCE_DELAY).await;

    match read_branch_head(host, owner, repo_name, branch).await {
        Ok(head) => Ok(head),
        Err(Error::Host {
            source: github_client::Error::Transient(_),
            ..
        }) => {
            debug!(branch = branch, "convergence re-read failed, retrying once");
            tokio::time::sleep(CONVERGENCE_DELAY).await;
            match read_branch_head(host, owner, repo_name, branch).await {
                Ok(head) => Ok(head),
                Err(Error::Host {
                    source: source @ github_client::Error::Transient(_),
                    ..
                }) => Err(Error::TransientHost {
                    stage: "bootstrap convergence",
                    source,
                }),
                Err(error) => Err(error),
            }
        }
        Err(error) => Err(error),
    }
}
