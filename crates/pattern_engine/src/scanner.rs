//! Walks a project's file set through the rewriter and aggregates a report.

use serde::Serialize;
use tracing::{debug, info};

use crate::errors::Error;
use crate::rewriter::{self, CleaningChange};

#[cfg(test)]
#[path = "scanner_tests.rs"]
mod tests;

/// Manifest and deployment config files the report counts separately.
const MANIFEST_FILES: &[&str] = &[
    "package.json",
    ".env",
    ".env.example",
    "docker-compose.yml",
    "vercel.json",
    "netlify.toml",
];

/// One input file, as supplied by the caller.
///
/// Identity is `path`, unique within a project, forward-slash separated and
/// relative to the project root.
#[derive(Debug, Clone)]
pub struct FileRecord {
    pub path: String,
    pub content: Vec<u8>,
}

impl FileRecord {
    pub fn new(path: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }

    pub fn size_bytes(&self) -> usize {
        self.content.len()
    }
}

/// The scanner's classification of one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileClass {
    /// Dependency lock file; excluded from publishing.
    LockFile,
    /// Non-text content; excluded from publishing.
    Binary,
    /// Project manifest or deployment config; rewritten like source.
    Manifest,
    /// Ordinary text file.
    Source,
}

/// Classifies a file by name and content.
pub fn classify(path: &str, content: &[u8]) -> FileClass {
    if rewriter::is_lock_file(path) {
        return FileClass::LockFile;
    }
    if !rewriter::is_text(content) {
        return FileClass::Binary;
    }
    let name = path.rsplit('/').next().unwrap_or(path);
    if MANIFEST_FILES.contains(&name) {
        return FileClass::Manifest;
    }
    FileClass::Source
}

/// One rewritten file, ready for the commit tree.
#[derive(Debug, Clone)]
pub struct CleanedFileRecord {
    pub path: String,
    pub content: String,
    pub change_count: usize,
}

impl CleanedFileRecord {
    pub fn size_bytes(&self) -> usize {
        self.content.len()
    }
}

/// Project-level result of a scan.
#[derive(Debug, Default, Serialize)]
pub struct ScanOutcome {
    /// Rewritten files in input order.
    #[serde(skip)]
    pub cleaned: Vec<CleanedFileRecord>,
    /// Paths dropped from the publishable set (lock files, binaries).
    pub excluded: Vec<String>,
    /// Every substitution performed, across all files.
    pub changes: Vec<CleaningChange>,
    /// Total number of substitutions.
    pub total_changes: usize,
    /// Number of manifest/config files that were rewritten.
    pub manifests_scanned: usize,
}

impl ScanOutcome {
    /// Number of files that received at least one substitution.
    pub fn files_touched(&self) -> usize {
        self.cleaned.iter().filter(|f| f.change_count > 0).count()
    }
}

/// Runs every eligible file through the rewriter.
///
/// Output order follows input order; tree-entry ordering carries no meaning
/// in the Git object model, but a deterministic order keeps reports and
/// diffs stable. Returns [`Error::NoEligibleFiles`] when filtering leaves
/// nothing to publish.
pub fn scan(files: &[FileRecord]) -> Result<ScanOutcome, Error> {
    let mut outcome = ScanOutcome::default();

    for file in files {
        match classify(&file.path, &file.content) {
            FileClass::LockFile | FileClass::Binary => {
                debug!(file = %file.path, "excluded from publishable set");
                outcome.excluded.push(file.path.clone());
            }
            class => {
                if class == FileClass::Manifest {
                    outcome.manifests_scanned += 1;
                }
                let rewritten = rewriter::rewrite(&file.path, &file.content);
                outcome.total_changes += rewritten.changes.len();
                outcome.cleaned.push(CleanedFileRecord {
                    path: file.path.clone(),
                    // rewrite() passes non-text through the excluded arm above,
                    // so this is always valid UTF-8.
                    content: String::from_utf8_lossy(&rewritten.content).into_owned(),
                    change_count: rewritten.changes.len(),
                });
                outcome.changes.extend(rewritten.changes);
            }
        }
    }

    if outcome.cleaned.is_empty() {
        return Err(Error::NoEligibleFiles);
    }

    info!(
        files = outcome.cleaned.len(),
        touched = outcome.files_touched(),
        excluded = outcome.excluded.len(),
        substitutions = outcome.total_changes,
        "project scan complete"
    );

    Ok(outcome)
}
