use clap::{Parser, Subcommand};

mod commands;
mod config;
mod errors;
mod loader;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::commands::{publish_cmd, rules_cmd, scan_cmd};

/// RepoLiberator CLI: rewrite a project off proprietary hosted services and
/// publish the result to GitHub.
#[derive(Parser)]
#[command(name = "liberator")]
#[command(
    about = "Rewrite a project off proprietary SaaS dependencies and publish it to GitHub",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan a project and report what would be rewritten, without publishing
    Scan(scan_cmd::ScanArgs),

    /// Rewrite a project and publish it as a single commit
    Publish(publish_cmd::PublishArgs),

    /// List the pattern catalog
    ListRules,

    /// Show the CLI version
    Version,
}

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer().pretty())
        .with(EnvFilter::from_env("REPO_LIBERATOR_LOG"))
        .init();

    let cli = Cli::parse();
    match &cli.command {
        Commands::Scan(args) => {
            if let Err(e) = scan_cmd::execute(args) {
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
        }
        Commands::Publish(args) => match publish_cmd::execute(args).await {
            Ok(result) => {
                if result.success {
                    println!("{}", result.message);
                    std::process::exit(0);
                } else {
                    println!("Failed to publish: {}", result.message);
                    std::process::exit(1);
                }
            }
            Err(e) => {
                eprintln!("Error: {e}");
                std::process::exit(2);
            }
        },
        Commands::ListRules => rules_cmd::execute(),
        Commands::Version => println!("liberator {}", env!("CARGO_PKG_VERSION")),
    }
}
