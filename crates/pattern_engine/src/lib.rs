//! Pattern Engine for RepoLiberator
//!
//! This crate holds the proprietary-service pattern catalog, the source
//! rewriter that applies it to one file at a time, and the project scanner
//! that turns a whole file set into rewritten content plus a change report.
//! Everything here is pure: no network, no disk I/O.

pub mod catalog;
pub mod rewriter;
pub mod scanner;

mod errors;
pub use errors::Error;

pub use catalog::{catalog, PatternRule, ServiceCategory};
pub use rewriter::{rewrite, CleaningChange, RewriteOutcome};
pub use scanner::{scan, CleanedFileRecord, FileClass, FileRecord, ScanOutcome};
