//! Write-side payloads for the Git object API.
//!
//! Publishing a commit is a strict sequence of object creations: blobs,
//! then one tree, then one commit, then a ref update. Each payload is a
//! serde type so its wire shape is covered by unit tests instead of being
//! discovered against the live host.

use base64::Engine;
use serde::{Deserialize, Serialize};

#[cfg(test)]
#[path = "git_objects_tests.rs"]
mod tests;

/// Git mode for a regular, non-executable file.
pub const FILE_MODE_BLOB: &str = "100644";

/// One entry in a tree-creation payload.
///
/// Exactly one of `content` and `sha` is present: `content` inlines small
/// files directly in the tree-creation call, `sha` references a blob that
/// was uploaded separately. The constructors are the only way this crate
/// builds entries, which keeps the exactly-one-of invariant out of caller
/// hands. `path` is repo-root-relative with forward slashes and must be
/// unique within one payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeEntry {
    /// Repository-relative path of the entry
    pub path: String,

    /// File mode (always [`FILE_MODE_BLOB`] for this pipeline)
    pub mode: String,

    /// Object type (`blob`)
    #[serde(rename = "type")]
    pub entry_type: String,

    /// Inline file content, for files under the inline threshold
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,

    /// SHA of a previously uploaded blob, for oversized files
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sha: Option<String>,
}

impl TreeEntry {
    /// Entry carrying its content inline.
    pub fn inline(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            mode: FILE_MODE_BLOB.to_string(),
            entry_type: "blob".to_string(),
            content: Some(content.into()),
            sha: None,
        }
    }

    /// Entry referencing an uploaded blob.
    pub fn blob(path: impl Into<String>, sha: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            mode: FILE_MODE_BLOB.to_string(),
            entry_type: "blob".to_string(),
            content: None,
            sha: Some(sha.into()),
        }
    }
}

/// Payload for `POST /repos/{owner}/{repo}/git/blobs`.
#[derive(Debug, Clone, Serialize)]
pub struct CreateBlobPayload {
    /// Base64-encoded file content
    pub content: String,
    /// Always `base64`; keeps non-UTF-8-safe bytes intact in JSON
    pub encoding: String,
}

impl CreateBlobPayload {
    /// Encodes raw bytes for upload.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self {
            content: base64::engine::general_purpose::STANDARD.encode(bytes),
            encoding: "base64".to_string(),
        }
    }
}

/// Payload for `POST /repos/{owner}/{repo}/git/trees`.
///
/// `base_tree` is present for an incremental commit extending prior history
/// and absent for a root tree; serialization omits the field entirely in
/// the root case.
#[derive(Debug, Clone, Serialize)]
pub struct CreateTreePayload {
    /// Tree of the base commit, when one exists
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_tree: Option<String>,
    /// All entries of the new tree
    pub tree: Vec<TreeEntry>,
}

/// Payload for `POST /repos/{owner}/{repo}/git/commits`.
#[derive(Debug, Clone, Serialize)]
pub struct CreateCommitPayload {
    /// Commit message
    pub message: String,
    /// SHA of the tree this commit snapshots
    pub tree: String,
    /// Parent commit SHAs; empty (and omitted) for a root commit
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub parents: Vec<String>,
}

/// Payload for `POST /repos/{owner}/{repo}/git/refs`.
#[derive(Debug, Clone, Serialize)]
pub struct CreateRefPayload {
    /// Fully qualified ref name, e.g. `refs/heads/main`
    #[serde(rename = "ref")]
    pub ref_name: String,
    /// Commit SHA the new ref points at
    pub sha: String,
}

impl CreateRefPayload {
    /// Payload creating a branch head.
    pub fn for_branch(branch: &str, sha: impl Into<String>) -> Self {
        Self {
            ref_name: format!("refs/heads/{branch}"),
            sha: sha.into(),
        }
    }
}

/// Payload for `PATCH /repos/{owner}/{repo}/git/refs/heads/{branch}`.
#[derive(Debug, Clone, Serialize)]
pub struct UpdateRefPayload {
    /// Commit SHA the ref should point at
    pub sha: String,
    /// When false the host rejects non-fast-forward updates
    pub force: bool,
}

/// Response shape shared by blob, tree, and commit creation.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedObject {
    /// SHA of the created object
    pub sha: String,
}
