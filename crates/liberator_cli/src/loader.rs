//! Loads a project directory into the file set the pipeline consumes.

use std::path::Path;

use pattern_engine::FileRecord;
use tracing::debug;
use walkdir::WalkDir;

use crate::errors::Error;

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;

/// Directories never worth publishing: version control metadata and
/// dependency or build output that the liberated project regenerates.
const SKIPPED_DIRS: &[&str] = &[".git", "node_modules", "dist", "build", ".next", "target"];

/// Reads every file under `root` into memory, skipping [`SKIPPED_DIRS`].
///
/// Paths are repo-root-relative with forward slashes, ordered
/// deterministically by file name. Binary detection happens later in the
/// scanner; the loader hands everything through as raw bytes.
pub fn load_project(root: &Path) -> Result<Vec<FileRecord>, Error> {
    let mut files = Vec::new();

    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            // depth 0 is the project root itself, whatever it is named.
            let name = entry.file_name().to_string_lossy();
            entry.depth() == 0
                || !(entry.file_type().is_dir() && SKIPPED_DIRS.contains(&name.as_ref()))
        });

    for entry in walker {
        let entry = entry.map_err(|e| Error::LoadFile(e.into()))?;
        if !entry.file_type().is_file() {
            continue;
        }

        let relative = entry
            .path()
            .strip_prefix(root)
            .unwrap_or(entry.path())
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect::<Vec<_>>()
            .join("/");

        let content = std::fs::read(entry.path()).map_err(Error::LoadFile)?;
        debug!(file = relative, bytes = content.len(), "loaded project file");
        files.push(FileRecord::new(relative, content));
    }

    Ok(files)
}
