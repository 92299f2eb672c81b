//! Crate for interacting with the GitHub REST API.
//!
//! This crate provides a client for making authenticated requests to GitHub
//! using a caller-supplied personal or installation token. It covers the
//! calls the publishing pipeline needs: repository metadata read/create, the
//! contents API (for bootstrapping an empty repository), and the low-level
//! Git object API (blobs, trees, commits, refs).

use async_trait::async_trait;
use octocrab::{Octocrab, Result as OctocrabResult};
use serde::Serialize;
use tracing::{debug, error, info, instrument};

pub mod errors;
pub use errors::Error;

pub mod models;

pub mod contents;
pub use contents::CreateFilePayload;

pub mod git_objects;
pub use git_objects::{
    CreateBlobPayload, CreateCommitPayload, CreateRefPayload, CreateTreePayload, CreatedObject,
    TreeEntry, UpdateRefPayload,
};

// Reference the tests module in the separate file
#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;

/// Represents the payload for creating a new repository via the REST API.
/// Use `Default::default()` and modify fields as needed.
#[derive(Serialize, Default, Debug, Clone)]
pub struct RepositoryCreatePayload {
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub private: Option<bool>, // Defaults to false if None

    /// Always serialized. Auto-initialization would create a README commit
    /// that races the explicit bootstrap step.
    pub auto_init: bool,
}

/// Trait for the repository-host operations the publishing pipeline
/// consumes.
///
/// The pipeline is written against this trait so its stages can be tested
/// with an in-process mock host; [`GitHubClient`] is the production
/// implementation.
#[async_trait]
pub trait RepositoryHost: Send + Sync {
    /// Fetches metadata for a repository.
    ///
    /// # Errors
    /// Returns `Error::NotFound` when the repository does not exist or is
    /// invisible to the token.
    async fn get_repository(&self, owner: &str, repo: &str)
        -> Result<models::Repository, Error>;

    /// Creates a new repository for the authenticated user.
    async fn create_user_repository(
        &self,
        payload: &RepositoryCreatePayload,
    ) -> Result<models::Repository, Error>;

    /// Reads the head of a branch.
    ///
    /// # Errors
    /// Returns `Error::NotFound` when the branch has no commits.
    async fn get_branch_ref(
        &self,
        owner: &str,
        repo: &str,
        branch: &str,
    ) -> Result<models::GitRef, Error>;

    /// Reads a commit object, including the tree it points at.
    async fn get_commit(
        &self,
        owner: &str,
        repo: &str,
        sha: &str,
    ) -> Result<models::GitCommit, Error>;

    /// Writes a single file through the contents API, creating a commit on
    /// the payload's branch. Used only for bootstrap.
    async fn create_file(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
        payload: &CreateFilePayload,
    ) -> Result<(), Error>;

    /// Uploads one blob and returns its sha.
    async fn create_blob(
        &self,
        owner: &str,
        repo: &str,
        payload: &CreateBlobPayload,
    ) -> Result<String, Error>;

    /// Creates a tree and returns its sha.
    async fn create_tree(
        &self,
        owner: &str,
        repo: &str,
        payload: &CreateTreePayload,
    ) -> Result<String, Error>;

    /// Creates a commit object and returns its sha.
    async fn create_commit(
        &self,
        owner: &str,
        repo: &str,
        payload: &CreateCommitPayload,
    ) -> Result<String, Error>;

    /// Creates a new ref.
    ///
    /// # Errors
    /// Returns `Error::Validation` when the ref already exists.
    async fn create_ref(
        &self,
        owner: &str,
        repo: &str,
        payload: &CreateRefPayload,
    ) -> Result<(), Error>;

    /// Moves an existing branch ref.
    ///
    /// # Errors
    /// Returns `Error::Validation` or `Error::Conflict` when a non-force
    /// update is not a fast forward.
    async fn update_ref(
        &self,
        owner: &str,
        repo: &str,
        branch: &str,
        payload: &UpdateRefPayload,
    ) -> Result<(), Error>;
}

/// A client for interacting with the GitHub API, authenticated with a
/// caller-supplied token.
#[derive(Debug)]
pub struct GitHubClient {
    client: Octocrab,
}

impl GitHubClient {
    /// Creates a new `GitHubClient` from a configured `Octocrab` instance.
    pub fn new(client: Octocrab) -> Self {
        Self { client }
    }
}

#[async_trait]
impl RepositoryHost for GitHubClient {
    #[instrument(skip(self), fields(owner = %owner, repo = %repo))]
    async fn get_repository(
        &self,
        owner: &str,
        repo: &str,
    ) -> Result<models::Repository, Error> {
        let path = format!("/repos/{owner}/{repo}");
        let result: OctocrabResult<octocrab::models::Repository> =
            self.client.get(path, None::<&()>).await;
        match result {
            Ok(r) => Ok(models::Repository::from(r)),
            Err(e) => Err(classify_octocrab_error("Failed to get repository", e)),
        }
    }

    #[instrument(skip(self, payload), fields(repo = %payload.name))]
    async fn create_user_repository(
        &self,
        payload: &RepositoryCreatePayload,
    ) -> Result<models::Repository, Error> {
        let response: OctocrabResult<octocrab::models::Repository> =
            self.client.post("/user/repos", Some(payload)).await;
        match response {
            Ok(r) => {
                info!(repo = payload.name, "created repository");
                Ok(models::Repository::from(r))
            }
            Err(e) => Err(classify_octocrab_error(
                "Failed to create repository for user",
                e,
            )),
        }
    }

    #[instrument(skip(self), fields(owner = %owner, repo = %repo, branch = %branch))]
    async fn get_branch_ref(
        &self,
        owner: &str,
        repo: &str,
        branch: &str,
    ) -> Result<models::GitRef, Error> {
        let path = format!("/repos/{owner}/{repo}/git/ref/heads/{branch}");
        let result: OctocrabResult<models::GitRef> = self.client.get(path, None::<&()>).await;
        match result {
            Ok(r) => {
                debug!(sha = r.object.sha, "resolved branch head");
                Ok(r)
            }
            Err(e) => Err(classify_octocrab_error("Failed to read branch ref", e)),
        }
    }

    #[instrument(skip(self), fields(owner = %owner, repo = %repo, sha = %sha))]
    async fn get_commit(
        &self,
        owner: &str,
        repo: &str,
        sha: &str,
    ) -> Result<models::GitCommit, Error> {
        let path = format!("/repos/{owner}/{repo}/git/commits/{sha}");
        let result: OctocrabResult<models::GitCommit> = self.client.get(path, None::<&()>).await;
        result.map_err(|e| classify_octocrab_error("Failed to read commit", e))
    }

    #[instrument(skip(self, payload), fields(owner = %owner, repo = %repo, file = %path))]
    async fn create_file(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
        payload: &CreateFilePayload,
    ) -> Result<(), Error> {
        let route = format!("/repos/{owner}/{repo}/contents/{path}");
        let result: OctocrabResult<serde_json::Value> =
            self.client.put(route, Some(payload)).await;
        match result {
            Ok(_) => {
                info!(file = path, "wrote file through contents API");
                Ok(())
            }
            Err(e) => Err(classify_octocrab_error("Failed to write file", e)),
        }
    }

    #[instrument(skip(self, payload), fields(owner = %owner, repo = %repo))]
    async fn create_blob(
        &self,
        owner: &str,
        repo: &str,
        payload: &CreateBlobPayload,
    ) -> Result<String, Error> {
        let path = format!("/repos/{owner}/{repo}/git/blobs");
        let result: OctocrabResult<CreatedObject> = self.client.post(path, Some(payload)).await;
        match result {
            Ok(created) => {
                debug!(sha = created.sha, "uploaded blob");
                Ok(created.sha)
            }
            Err(e) => Err(classify_octocrab_error("Failed to create blob", e)),
        }
    }

    #[instrument(skip(self, payload), fields(owner = %owner, repo = %repo, entries = payload.tree.len()))]
    async fn create_tree(
        &self,
        owner: &str,
        repo: &str,
        payload: &CreateTreePayload,
    ) -> Result<String, Error> {
        let path = format!("/repos/{owner}/{repo}/git/trees");
        let result: OctocrabResult<CreatedObject> = self.client.post(path, Some(payload)).await;
        match result {
            Ok(created) => {
                info!(
                    sha = created.sha,
                    entries = payload.tree.len(),
                    incremental = payload.base_tree.is_some(),
                    "created tree"
                );
                Ok(created.sha)
            }
            Err(e) => Err(classify_octocrab_error("Failed to create tree", e)),
        }
    }

    #[instrument(skip(self, payload), fields(owner = %owner, repo = %repo))]
    async fn create_commit(
        &self,
        owner: &str,
        repo: &str,
        payload: &CreateCommitPayload,
    ) -> Result<String, Error> {
        let path = format!("/repos/{owner}/{repo}/git/commits");
        let result: OctocrabResult<CreatedObject> = self.client.post(path, Some(payload)).await;
        match result {
            Ok(created) => {
                info!(
                    sha = created.sha,
                    parents = payload.parents.len(),
                    "created commit object"
                );
                Ok(created.sha)
            }
            Err(e) => Err(classify_octocrab_error("Failed to create commit", e)),
        }
    }

    #[instrument(skip(self, payload), fields(owner = %owner, repo = %repo, ref_name = %payload.ref_name))]
    async fn create_ref(
        &self,
        owner: &str,
        repo: &str,
        payload: &CreateRefPayload,
    ) -> Result<(), Error> {
        let path = format!("/repos/{owner}/{repo}/git/refs");
        let result: OctocrabResult<models::GitRef> = self.client.post(path, Some(payload)).await;
        match result {
            Ok(_) => {
                info!(ref_name = payload.ref_name, "created ref");
                Ok(())
            }
            Err(e) => Err(classify_octocrab_error("Failed to create ref", e)),
        }
    }

    #[instrument(skip(self, payload), fields(owner = %owner, repo = %repo, branch = %branch, force = payload.force))]
    async fn update_ref(
        &self,
        owner: &str,
        repo: &str,
        branch: &str,
        payload: &UpdateRefPayload,
    ) -> Result<(), Error> {
        let path = format!("/repos/{owner}/{repo}/git/refs/heads/{branch}");
        let result: OctocrabResult<models::GitRef> = self.client.patch(path, Some(payload)).await;
        match result {
            Ok(_) => {
                info!(branch = branch, sha = payload.sha, "updated branch ref");
                Ok(())
            }
            Err(e) => Err(classify_octocrab_error("Failed to update ref", e)),
        }
    }
}

/// Creates an `Octocrab` client authenticated with a personal or
/// installation token.
///
/// The token is treated as an opaque string; this crate never validates or
/// refreshes it. An expired or revoked token surfaces as
/// [`Error::AuthError`] on the first call that uses it.
#[instrument(skip(token))]
pub fn create_token_client(token: &str) -> Result<Octocrab, Error> {
    Octocrab::builder()
        .personal_token(token.to_string())
        .build()
        .map_err(|_| Error::ApiError())
}

/// Classifies an octocrab failure into this crate's error taxonomy and logs
/// it with context.
fn classify_octocrab_error(message: &str, e: octocrab::Error) -> Error {
    match e {
        octocrab::Error::GitHub { source, .. } => {
            let status = source.status_code;
            let body = source.message.clone();
            error!(
                status = status.as_u16(),
                error_message = body,
                "{}. Received an error from GitHub",
                message
            );
            match status.as_u16() {
                401 => Error::AuthError(body),
                403 => {
                    if body.to_ascii_lowercase().contains("rate limit") {
                        Error::RateLimitExceeded { remaining: None }
                    } else {
                        Error::AuthError(body)
                    }
                }
                404 => Error::NotFound,
                409 => Error::Conflict(body),
                422 => Error::Validation(body),
                code if code >= 500 => Error::Transient(body),
                _ => Error::ApiError(),
            }
        }
        octocrab::Error::UriParse { source, .. } => {
            error!(
                error_message = source.to_string(),
                "{}. Failed to parse URI.", message
            );
            Error::InvalidResponse
        }
        octocrab::Error::Uri { source, .. } => {
            error!(
                error_message = source.to_string(),
                "{}. Failed to parse URI.", message
            );
            Error::InvalidResponse
        }
        octocrab::Error::InvalidHeaderValue { source, .. } => {
            error!(
                error_message = source.to_string(),
                "{}. One of the header values was invalid.", message
            );
            Error::InvalidResponse
        }
        octocrab::Error::InvalidUtf8 { source, .. } => {
            error!(
                error_message = source.to_string(),
                "{}. The message wasn't valid UTF-8.", message
            );
            Error::InvalidResponse
        }
        other => {
            error!(error_message = other.to_string(), message);
            Error::Transient(other.to_string())
        }
    }
}
