//! Creates the commit object and moves the branch ref onto it.

use github_client::{CreateCommitPayload, CreateRefPayload, RepositoryHost, UpdateRefPayload};
use tracing::{info, warn};

use crate::errors::Error;
use crate::resolver::RepoState;

#[cfg(test)]
#[path = "publisher_tests.rs"]
mod tests;

/// Creates a commit for `tree_sha` and points the branch ref at it.
///
/// The commit's parent is the resolved base commit when one exists; with no
/// base the commit is a true root commit and the ref is created rather than
/// updated. The non-force update in the normal path means a branch that
/// moved underneath the publish is rejected by the host instead of being
/// overwritten; only the just-bootstrapped race (the ref appearing between
/// resolution and ref creation) is resolved with a forced update.
///
/// A ref failure after the commit object was created leaves that commit
/// orphaned on the host. It is unreachable, the host garbage-collects it,
/// and retrying the whole publish is simpler and safer than a compensating
/// delete.
pub async fn publish_commit(
    host: &dyn RepositoryHost,
    state: &RepoState,
    tree_sha: &str,
    message: &str,
) -> Result<String, Error> {
    let parents: Vec<String> = state.base_commit_sha.iter().cloned().collect();
    let payload = CreateCommitPayload {
        message: message.to_string(),
        tree: tree_sha.to_string(),
        parents,
    };

    let commit_sha = host
        .create_commit(&state.owner, &state.repo_name, &payload)
        .await
        .map_err(|e| Error::from_host("commit creation", e))?;

    match &state.base_commit_sha {
        Some(_) => {
            let update = UpdateRefPayload {
                sha: commit_sha.clone(),
                force: false,
            };
            host.update_ref(&state.owner, &state.repo_name, &state.branch, &update)
                .await
                .map_err(|error| match error {
                    github_client::Error::Conflict(_) | github_client::Error::Validation(_) => {
                        Error::RefConflict {
                            branch: state.branch.clone(),
                        }
                    }
                    other => Error::from_host("ref update", other),
                })?;
        }
        None => {
            let create = CreateRefPayload::for_branch(&state.branch, commit_sha.clone());
            match host
                .create_ref(&state.owner, &state.repo_name, &create)
                .await
            {
                Ok(()) => {}
                Err(error) if error.is_already_exists() => {
                    // The bootstrap commit landed after resolution saw an
                    // empty branch; replace it.
                    warn!(
                        branch = state.branch,
                        "ref appeared after bootstrap, forcing update"
                    );
                    let update = UpdateRefPayload {
                        sha: commit_sha.clone(),
                        force: true,
                    };
                    host.update_ref(&state.owner, &state.repo_name, &state.branch, &update)
                        .await
                        .map_err(|e| Error::from_host("ref update", e))?;
                }
                Err(error) => return Err(Error::from_host("ref creation", error)),
            }
        }
    }

    info!(
        owner = state.owner,
        repo = state.repo_name,
        branch = state.branch,
        commit = commit_sha,
        "branch ref now points at the published commit"
    );

    Ok(commit_sha)
}
