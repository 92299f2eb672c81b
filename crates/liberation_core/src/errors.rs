//! Error taxonomy for the publishing pipeline.
//!
//! Every stage fails closed: a failure anywhere means nothing was published,
//! even though orphaned blobs or commit objects may transiently exist on the
//! host (they are unreachable and garbage-collected there). The variants map
//! one-to-one onto the decisions a caller can make: fix the input, fix the
//! token, back off, retry the whole publish, or give up.

use thiserror::Error;

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

#[derive(Error, Debug)]
pub enum Error {
    /// The destination identifier was not of the form `owner/repository`.
    #[error("destination must look like 'owner/repository', got '{0}'")]
    InvalidDestination(String),

    /// Filtering left no files to publish. Raised before any host call.
    #[error("no files eligible for publishing after filtering out lock files and binary content")]
    NoEligibleFiles,

    /// Neither the primary nor the legacy branch name was accepted while
    /// bootstrapping. No further names are guessed.
    #[error("could not determine a writable branch for {owner}/{repo}")]
    BranchUnresolved { owner: String, repo: String },

    /// The host rejected the supplied token. Never retried; retrying with
    /// the same token cannot succeed.
    #[error("the host rejected the supplied token: {0}")]
    Auth(String),

    /// The host is throttling requests. The pipeline does not sleep and
    /// retry; backoff is the caller's decision.
    #[error("the host is rate limiting requests")]
    RateLimit {
        /// Remaining request quota, when the host reported one.
        remaining: Option<u64>,
    },

    /// A network failure or 5xx that survived its single retry during the
    /// bootstrap convergence check.
    #[error("transient host failure during {stage}")]
    TransientHost {
        stage: &'static str,
        #[source]
        source: github_client::Error,
    },

    /// The branch moved while publishing. The base tree and commit this
    /// publish was computed against are stale; re-resolve and retry the
    /// whole publish.
    #[error("branch '{branch}' moved during publish; re-resolve and retry")]
    RefConflict { branch: String },

    /// Building the commit failed after blob uploads had begun. Orphaned
    /// blobs are left for the host to garbage-collect.
    #[error("publish aborted during {stage}; {files_expected} files would have been included")]
    PartialBuild {
        stage: &'static str,
        files_expected: usize,
        #[source]
        source: github_client::Error,
    },

    /// Any other host failure, tagged with the stage it happened in.
    #[error("host call failed during {stage}")]
    Host {
        stage: &'static str,
        #[source]
        source: github_client::Error,
    },
}

impl Error {
    /// Lifts a client error into the taxonomy, pulling out the classes with
    /// a fixed meaning regardless of stage.
    pub(crate) fn from_host(stage: &'static str, source: github_client::Error) -> Self {
        match source {
            github_client::Error::AuthError(message) => Error::Auth(message),
            github_client::Error::RateLimitExceeded { remaining } => Error::RateLimit { remaining },
            other => Error::Host {
                stage,
                source: other,
            },
        }
    }
}

impl From<pattern_engine::Error> for Error {
    fn from(value: pattern_engine::Error) -> Self {
        match value {
            pattern_engine::Error::NoEligibleFiles => Error::NoEligibleFiles,
        }
    }
}
