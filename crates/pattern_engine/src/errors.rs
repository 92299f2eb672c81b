use thiserror::Error;

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// Error types that can occur while scanning a project.
///
/// Rewriting a single file cannot fail at runtime; a broken catalog entry is
/// a programming error and is caught by the per-rule tests. The only runtime
/// failure the scanner can report is a file set that leaves nothing to
/// publish once lock files and binaries have been filtered out.
#[derive(Error, Debug)]
pub enum Error {
    /// Every file in the project was filtered out before rewriting.
    ///
    /// Publishing an empty tree is treated as a caller error, so the scanner
    /// refuses to hand an empty file set to the publishing pipeline.
    #[error("no files eligible for publishing after filtering out lock files and binary content")]
    NoEligibleFiles,
}
