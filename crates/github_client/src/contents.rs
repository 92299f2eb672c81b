//! Repository contents-API payloads.
//!
//! The contents API writes one file per call and is only used to bootstrap
//! an empty repository with its initial commit; every real publish goes
//! through the Git object API in [`crate::git_objects`].

use base64::Engine;
use serde::Serialize;

#[cfg(test)]
#[path = "contents_tests.rs"]
mod tests;

/// Payload for `PUT /repos/{owner}/{repo}/contents/{path}`.
#[derive(Debug, Clone, Serialize)]
pub struct CreateFilePayload {
    /// Commit message for the generated commit
    pub message: String,

    /// Base64-encoded file content
    pub content: String,

    /// Branch to commit to; omitted to target the repository default
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
}

impl CreateFilePayload {
    /// Builds a payload from raw file bytes.
    pub fn new(message: impl Into<String>, bytes: &[u8], branch: Option<String>) -> Self {
        Self {
            message: message.into(),
            content: base64::engine::general_purpose::STANDARD.encode(bytes),
            branch,
        }
    }
}
