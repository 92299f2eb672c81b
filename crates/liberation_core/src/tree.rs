//! Builds the commit tree from the cleaned file set.
//!
//! Small files travel inline in the tree-creation payload; files above the
//! inline threshold are uploaded as separate blobs first and referenced by
//! sha. Inlining everything would risk the host's request-size cap on large
//! projects, while always uploading blobs would multiply round-trips for the
//! common small-file case.

use futures::stream::{self, StreamExt, TryStreamExt};
use github_client::{CreateBlobPayload, CreateTreePayload, RepositoryHost, TreeEntry};
use pattern_engine::CleanedFileRecord;
use tracing::{debug, info};

use crate::errors::Error;
use crate::resolver::RepoState;

#[cfg(test)]
#[path = "tree_tests.rs"]
mod tests;

/// Largest file embedded directly in the tree-creation call.
pub const MAX_INLINE_BYTES: usize = 256 * 1024;

/// Upper bound on concurrent blob uploads.
const MAX_CONCURRENT_UPLOADS: usize = 4;

/// Creates the tree for the cleaned file set and returns its sha.
///
/// Blob uploads for oversized files run as a bounded concurrent fan-out and
/// are fully joined before the single tree-creation call; the tree
/// references `base_tree` exactly when the resolved state carries one. Any
/// single upload failure aborts the whole build: a tree referencing a
/// subset of files would silently drop changes, which is worse than failing
/// the operation outright.
pub async fn build_tree(
    host: &dyn RepositoryHost,
    state: &RepoState,
    cleaned: &[CleanedFileRecord],
) -> Result<String, Error> {
    if cleaned.is_empty() {
        return Err(Error::NoEligibleFiles);
    }

    let owner = state.owner.as_str();
    let repo = state.repo_name.as_str();
    let files_expected = cleaned.len();

    let entries: Vec<TreeEntry> = stream::iter(cleaned.iter().map(|file| async move {
        if file.size_bytes() > MAX_INLINE_BYTES {
            let payload = CreateBlobPayload::from_bytes(file.content.as_bytes());
            let sha = host.create_blob(owner, repo, &payload).await?;
            debug!(file = %file.path, sha = sha, "uploaded oversized file as blob");
            Ok::<TreeEntry, github_client::Error>(TreeEntry::blob(&file.path, sha))
        } else {
            Ok(TreeEntry::inline(&file.path, file.content.clone()))
        }
    }))
    .buffered(MAX_CONCURRENT_UPLOADS)
    .try_collect()
    .await
    .map_err(|e| build_failure("blob upload", files_expected, e))?;

    let payload = CreateTreePayload {
        base_tree: state.base_tree_sha.clone(),
        tree: entries,
    };

    let tree_sha = host
        .create_tree(owner, repo, &payload)
        .await
        .map_err(|e| build_failure("tree creation", files_expected, e))?;

    info!(
        owner = owner,
        repo = repo,
        tree = tree_sha,
        files = files_expected,
        incremental = state.base_tree_sha.is_some(),
        "tree created"
    );

    Ok(tree_sha)
}

/// Maps a client failure during the build, keeping auth and throttling
/// classes intact and folding everything else into the partial-build kind.
fn build_failure(
    stage: &'static str,
    files_expected: usize,
    source: github_client::Error,
) -> Error {
    match source {
        github_client::Error::AuthError(message) => Error::Auth(message),
        github_client::Error::RateLimitExceeded { remaining } => Error::RateLimit { remaining },
        other => Error::PartialBuild {
            stage,
            files_expected,
            source: other,
        },
    }
}
