//! # Models
//!
//! This module contains the data models used when talking to the GitHub
//! REST API: repository metadata and the read side of the Git object model
//! (refs and commits). The write-side payloads live in
//! [`crate::git_objects`].

use serde::{Deserialize, Serialize};
use url::Url;

#[cfg(test)]
#[path = "models_tests.rs"]
mod tests;

/// Represents a GitHub repository.
///
/// This struct contains essential information about a GitHub repository,
/// including its name, visibility, and default branch. It provides methods
/// for accessing repository properties and generating URLs.
///
/// # Examples
///
/// ```rust
/// use github_client::models::Repository;
///
/// let repo = Repository::new(
///     "my-repo".to_string(),
///     "owner/my-repo".to_string(),
///     "MDEwOlJlcG9zaXRvcnkx".to_string(),
///     true,
/// );
///
/// println!("Repository: {}", repo.name());
/// println!("Is private: {}", repo.is_private());
/// println!("URL: {}", repo.url());
/// ```
#[derive(Debug, Deserialize)]
pub struct Repository {
    /// The full name of the repository (owner/name)
    full_name: String,
    /// The name of the repository
    name: String,
    /// The GraphQL node ID of the repository
    node_id: String,
    /// Whether the repository is private
    private: bool,
    /// The branch new commits land on by default
    default_branch: Option<String>,
}

impl Repository {
    /// Creates a new Repository instance.
    pub fn new(name: String, full_name: String, node_id: String, private: bool) -> Self {
        Self {
            full_name,
            name,
            node_id,
            private,
            default_branch: None,
        }
    }

    /// Returns the name of the repository (without owner).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the full name of the repository (owner/name).
    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    /// Returns whether the repository is private.
    pub fn is_private(&self) -> bool {
        self.private
    }

    /// Returns the default branch, if the metadata carried one.
    ///
    /// Freshly created repositories without any commit may not report a
    /// default branch yet.
    pub fn default_branch(&self) -> Option<&str> {
        self.default_branch.as_deref()
    }

    /// Returns the GraphQL node ID of the repository.
    pub fn node_id(&self) -> &str {
        &self.node_id
    }

    /// Returns the web URL for the repository.
    ///
    /// # Panics
    ///
    /// Panics if the repository full name cannot be formatted into a valid
    /// URL. This should not happen with valid GitHub repository names.
    pub fn url(&self) -> Url {
        Url::parse(&format!("https://github.com/{}", self.full_name))
            .expect("Valid GitHub repository URL")
    }
}

impl From<octocrab::models::Repository> for Repository {
    fn from(value: octocrab::models::Repository) -> Self {
        Self {
            name: value.name.clone(),
            full_name: value.full_name.unwrap_or(value.name.clone()),
            node_id: value.node_id.unwrap_or_default(),
            private: value.private.unwrap_or(false),
            default_branch: value.default_branch,
        }
    }
}

/// A branch reference as returned by the Git ref API.
///
/// The `object` a ref points at is a commit for every ref this crate
/// touches.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GitRef {
    /// Fully qualified name, e.g. `refs/heads/main`
    #[serde(rename = "ref")]
    pub ref_name: String,
    /// The object the ref points at
    pub object: GitRefObject,
}

/// Target of a [`GitRef`].
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GitRefObject {
    /// SHA of the referenced object
    pub sha: String,
    /// Object type (`commit` for branch refs)
    #[serde(rename = "type")]
    pub object_type: String,
}

/// A commit as returned by the Git commit API.
///
/// Only the fields the publishing pipeline consumes are modeled: the commit
/// sha and the tree it snapshots.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GitCommit {
    /// SHA of the commit object
    pub sha: String,
    /// The tree the commit points at
    pub tree: TreeRef,
}

/// Tree pointer inside a [`GitCommit`].
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TreeRef {
    /// SHA of the tree object
    pub sha: String,
}
