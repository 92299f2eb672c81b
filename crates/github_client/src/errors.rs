//! Error types for GitHub client operations.
//!
//! This module defines the error types that can occur when interacting with
//! the GitHub API through the github_client crate. Responses are classified
//! by status code so callers can tell an expired token from a missing
//! repository, a throttled request, or a rejected ref update without parsing
//! provider messages themselves.

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// Errors that can occur during GitHub client operations.
///
/// Each variant represents a distinct class of failure. Callers decide the
/// retry policy; the client itself never retries.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A generic API request failure.
    ///
    /// The request reached GitHub but failed for a reason no other variant
    /// covers.
    #[error("API request failed")]
    ApiError(),

    /// The supplied token was rejected.
    ///
    /// Returned for 401 responses and for 403 responses that are not
    /// rate-limit signals. Retrying with the same token cannot succeed.
    #[error("GitHub rejected the supplied credentials: {0}")]
    AuthError(String),

    /// The request conflicted with the current state of the repository.
    ///
    /// Returned for 409 responses, e.g. a ref that moved underneath a
    /// non-force update.
    #[error("request conflicted with repository state: {0}")]
    Conflict(String),

    /// Error deserializing the response from GitHub.
    #[error("Failed to deserialize GitHub response: {0}")]
    Deserialization(#[from] serde_json::Error),

    /// The GitHub API returned a response in an unexpected format.
    #[error("Invalid response format")]
    InvalidResponse,

    /// The requested resource was not found.
    ///
    /// A 404 on repository metadata means the repository does not exist (or
    /// is invisible to this token); a 404 on a branch ref means the branch
    /// has no commits yet.
    #[error("Resource not found")]
    NotFound,

    /// GitHub API rate limit has been exceeded.
    ///
    /// `remaining` carries the quota hint when the response exposes one.
    /// The client does not sleep-and-retry; backoff is the caller's call.
    #[error("Rate limit exceeded")]
    RateLimitExceeded {
        /// Remaining request quota, if the host reported it.
        remaining: Option<u64>,
    },

    /// A network failure or 5xx response.
    ///
    /// The request may never have reached GitHub, or GitHub failed to
    /// process it; the operation may succeed if reissued.
    #[error("transient GitHub failure: {0}")]
    Transient(String),

    /// GitHub rejected the request payload.
    ///
    /// Returned for 422 responses. The message distinguishes "reference
    /// already exists" style rejections from genuinely invalid payloads.
    #[error("GitHub rejected the request: {0}")]
    Validation(String),
}

impl Error {
    /// True when the error is GitHub's already-exists style rejection,
    /// which idempotent callers treat as success.
    pub fn is_already_exists(&self) -> bool {
        match self {
            Error::Conflict(message) | Error::Validation(message) => {
                let message = message.to_ascii_lowercase();
                message.contains("already exists") || message.contains("\"sha\" wasn't supplied")
            }
            _ => false,
        }
    }
}
