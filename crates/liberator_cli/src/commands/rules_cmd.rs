//! Prints the pattern catalog.

use colored::Colorize;
use pattern_engine::catalog;

pub fn execute() {
    for rule in catalog() {
        println!(
            "{} {} {}",
            rule.id.bold(),
            format!("({})", rule.category).yellow(),
            rule.service
        );
        println!("    {}", rule.note.dimmed());
    }
}
