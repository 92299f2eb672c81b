//! Configuration management for the RepoLiberator CLI.
//!
//! Publishing defaults can be kept next to the project in a small TOML file
//! so repeated publishes do not need the full flag set. Flags always win
//! over file values.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::Error;

/// Default configuration file name, looked up in the project directory.
pub const DEFAULT_CONFIG_FILENAME: &str = "liberator.toml";

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;

/// Per-project publishing defaults.
///
/// # Example TOML Configuration
///
/// ```toml
/// destination = "octocat/liberated-app"
/// project_name = "My App"
/// commit_message = "Switch to self-hosted services"
/// ```
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Destination repository as `owner/repo`.
    pub destination: Option<String>,

    /// Display name used in the commit message.
    pub project_name: Option<String>,

    /// Commit message override.
    pub commit_message: Option<String>,
}

impl AppConfig {
    /// Loads configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, Error> {
        let raw = std::fs::read_to_string(path).map_err(Error::LoadFile)?;
        let config = toml::from_str(&raw).map_err(Error::ParseTomlFile)?;
        debug!(path = %path.display(), "loaded configuration file");
        Ok(config)
    }

    /// Loads `liberator.toml` from the project directory, or defaults when
    /// the file does not exist.
    pub fn load_for_project(project_root: &Path) -> Result<Self, Error> {
        let path = project_root.join(DEFAULT_CONFIG_FILENAME);
        if path.is_file() {
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }
}
