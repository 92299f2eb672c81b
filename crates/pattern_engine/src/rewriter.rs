//! Applies the pattern catalog to a single file.
//!
//! The rewriter is a pure function from file content to rewritten content
//! plus a structured change log. Dependency lock files and binary content
//! pass through verbatim: a lock file rewritten out of step with its
//! manifest would be worse than no lock file at all, so the scanner drops
//! both categories from the publishable set entirely.

use serde::Serialize;
use tracing::debug;

use crate::catalog::{catalog, PatternRule};

#[cfg(test)]
#[path = "rewriter_tests.rs"]
mod tests;

/// Dependency lock files, matched by exact file name.
const LOCK_FILES: &[&str] = &[
    "package-lock.json",
    "yarn.lock",
    "pnpm-lock.yaml",
    "bun.lockb",
    "npm-shrinkwrap.json",
    "composer.lock",
];

/// Longest excerpt kept in a change record.
const EXCERPT_MAX: usize = 120;

/// One substitution performed by the rewriter.
///
/// Append-only and used purely for reporting; changes are never replayed.
#[derive(Debug, Clone, Serialize)]
pub struct CleaningChange {
    /// Identifier of the rule that fired.
    pub rule_id: String,
    /// Path of the file the change was made in.
    pub file_path: String,
    /// 1-based line number of the match.
    pub line: usize,
    /// The matched text, truncated for display.
    pub original_excerpt: String,
    /// Migration note from the rule.
    pub note: String,
}

/// Result of rewriting one file.
#[derive(Debug, Clone)]
pub struct RewriteOutcome {
    /// The rewritten content; identical to the input when nothing fired.
    pub content: Vec<u8>,
    /// One entry per rule firing, in catalog order.
    pub changes: Vec<CleaningChange>,
}

/// Returns true when `path` names a dependency lock file.
pub fn is_lock_file(path: &str) -> bool {
    let name = path.rsplit('/').next().unwrap_or(path);
    LOCK_FILES.contains(&name)
}

/// Returns true when content looks like text.
///
/// Heuristic: decodes as UTF-8 and contains no NUL byte.
pub fn is_text(content: &[u8]) -> bool {
    match std::str::from_utf8(content) {
        Ok(text) => !text.contains('\0'),
        Err(_) => false,
    }
}

/// Rewrites one file against the full catalog.
///
/// Lock files and binary content are returned unchanged with an empty
/// change list. Running the rewriter on its own output produces no further
/// changes; no detector matches the replacement text its rule emits.
pub fn rewrite(path: &str, content: &[u8]) -> RewriteOutcome {
    if is_lock_file(path) || !is_text(content) {
        return RewriteOutcome {
            content: content.to_vec(),
            changes: Vec::new(),
        };
    }

    // Guarded by is_text above.
    let text = String::from_utf8_lossy(content).into_owned();
    let (rewritten, changes) = rewrite_text(path, &text);

    RewriteOutcome {
        content: rewritten.into_bytes(),
        changes,
    }
}

/// Applies every catalog rule to `text`, in catalog order.
pub(crate) fn rewrite_text(path: &str, text: &str) -> (String, Vec<CleaningChange>) {
    let mut current = text.to_string();
    let mut changes = Vec::new();

    for rule in catalog() {
        apply_rule(rule, path, &mut current, &mut changes);
    }

    if !changes.is_empty() {
        debug!(
            file = path,
            substitutions = changes.len(),
            "rewrote proprietary service usage"
        );
    }

    (current, changes)
}

/// Applies one rule's detectors, recording a change per match before the
/// replacement shifts offsets.
fn apply_rule(
    rule: &PatternRule,
    path: &str,
    current: &mut String,
    changes: &mut Vec<CleaningChange>,
) {
    for detector in &rule.detect {
        let mut matched = false;
        for m in detector.find_iter(current) {
            matched = true;
            changes.push(CleaningChange {
                rule_id: rule.id.to_string(),
                file_path: path.to_string(),
                line: line_of_offset(current, m.start()),
                original_excerpt: excerpt(m.as_str()),
                note: rule.note.to_string(),
            });
        }
        if matched {
            *current = detector
                .replace_all(current, rule.replace.as_str())
                .into_owned();
        }
    }
}

/// 1-based line number of a byte offset.
fn line_of_offset(text: &str, offset: usize) -> usize {
    text[..offset].bytes().filter(|b| *b == b'\n').count() + 1
}

/// Truncates a match for display in the change log.
fn excerpt(matched: &str) -> String {
    if matched.len() <= EXCERPT_MAX {
        return matched.to_string();
    }
    let mut end = EXCERPT_MAX;
    while !matched.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &matched[..end])
}
