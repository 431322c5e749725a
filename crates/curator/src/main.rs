//! Curator CLI - sort a folder of photos into website gallery categories.
//!
//! Each photo is scored against a fixed set of project categories with a
//! local CLIP model, copied into `gallery/<category>/` and listed in a JSON
//! summary the site reads.
//!
//! # Usage
//!
//! ```bash
//! # One-time model download
//! curator models download
//!
//! # Preview, then run for real
//! curator categorize --dry-run
//! curator categorize --clean
//!
//! # View configuration
//! curator config show
//! ```

use clap::{Parser, Subcommand};

mod cli;
mod logging;

/// Curator - zero-shot photo categorization for a static gallery.
#[derive(Parser, Debug)]
#[command(name = "curator")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Classify source photos and copy them into the gallery
    Categorize(cli::categorize::CategorizeArgs),

    /// Manage the CLIP model files (download, list, path)
    Models(cli::models::ModelsArgs),

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logging isn't initialized yet, so config warnings go through eprintln.
    let config = match curator_core::Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "Warning: Failed to load config: {e}\n  \
                 Using default logging settings. Check your config file with `curator config path`."
            );
            curator_core::Config::default()
        }
    };
    logging::init_from_config(&config, cli.verbose, cli.json_logs);

    tracing::debug!("Curator v{}", curator_core::VERSION);

    match cli.command {
        Commands::Categorize(args) => cli::categorize::execute(args),
        Commands::Models(args) => cli::models::execute(args),
        Commands::Config(args) => cli::config::execute(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_categorize_flags() {
        let cli = Cli::parse_from(["curator", "-v", "categorize", "--dry-run", "--limit", "2"]);
        assert!(cli.verbose);
        match cli.command {
            Commands::Categorize(args) => {
                assert!(args.dry_run);
                assert!(!args.clean);
                assert_eq!(args.limit, 2);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
