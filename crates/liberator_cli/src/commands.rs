//! Command modules for the RepoLiberator CLI.
//!
//! Each submodule handles one command:
//!
//! - `scan_cmd`: dry-run report of what would be rewritten
//! - `publish_cmd`: full rewrite-and-publish pipeline
//! - `rules_cmd`: pattern catalog listing

pub mod publish_cmd;
pub mod rules_cmd;
pub mod scan_cmd;
