use std::io;

use thiserror::Error;

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// Errors that can occur in the RepoLiberator CLI application.
#[derive(Error, Debug)]
pub enum Error {
    /// No usable token was supplied.
    ///
    /// Returned when neither `--token` nor the `GITHUB_TOKEN` environment
    /// variable provides a write-capable token.
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Invalid command-line arguments were provided.
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// Failed to load a file from the filesystem.
    #[error("Failed to load file.")]
    LoadFile(#[source] io::Error),

    /// Failed to parse a TOML configuration file.
    #[error("Failed to parse TOML configuration file.")]
    ParseTomlFile(#[source] toml::de::Error),

    /// Scanning the project produced nothing to publish.
    #[error(transparent)]
    Scan(#[from] pattern_engine::Error),
}
