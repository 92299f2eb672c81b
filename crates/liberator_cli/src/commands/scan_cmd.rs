//! Dry-run scan: report substitutions and exclusions without publishing.

use std::path::PathBuf;

use clap::Args;
use colored::Colorize;

use crate::errors::Error;
use crate::loader;

/// Arguments for the `scan` command.
#[derive(Args, Debug)]
pub struct ScanArgs {
    /// Path to the project directory
    pub path: PathBuf,
}

pub fn execute(args: &ScanArgs) -> Result<(), Error> {
    let files = loader::load_project(&args.path)?;
    let outcome = pattern_engine::scan(&files)?;

    for change in &outcome.changes {
        println!(
            "{}:{} {} {}",
            change.file_path.bold(),
            change.line,
            format!("[{}]", change.rule_id).yellow(),
            change.original_excerpt
        );
        println!("    {}", change.note.dimmed());
    }

    if !outcome.excluded.is_empty() {
        println!();
        println!("{}", "Excluded from publishing:".bold());
        for path in &outcome.excluded {
            println!("    {path}");
        }
    }

    println!();
    println!(
        "{} files scanned, {} touched, {} substitutions, {} excluded",
        outcome.cleaned.len(),
        outcome.files_touched(),
        outcome.total_changes,
        outcome.excluded.len()
    );

    Ok(())
}
