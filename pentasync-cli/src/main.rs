//! pentasync: publish a conference schedule cache as static pages.
//!
//! # Usage
//!
//! ```text
//! pentasync [--config <path>] [-v...] sync [--dry-run] [--json] [--jobs N]
//! pentasync [--config <path>] diff
//! pentasync [--config <path>] check
//! ```
//!
//! Every command also takes `--cache-dir`, `--output-dir` and
//! `--template-dir` to override `pentasync.yaml`.

mod commands;

use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};

use commands::{check::CheckArgs, diff::DiffArgs, sync::SyncArgs};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "pentasync",
    version,
    about = "Render a conference schedule cache into a static page tree",
    long_about = None,
)]
struct Cli {
    /// Site configuration file.
    #[arg(long, global = true, default_value = pentasync_core::DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// More log output on stderr (-v info, -vv debug). RUST_LOG wins.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Render every page and reconcile the output directory.
    Sync(SyncArgs),

    /// Show unified diffs of what sync would change.
    Diff(DiffArgs),

    /// Load and index the cache, and print what it holds.
    Check(CheckArgs),
}

fn init_tracing(verbose: u8) {
    use tracing_subscriber::{fmt, EnvFilter};

    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.command {
        Commands::Sync(args) => args.run(&cli.config),
        Commands::Diff(args) => args.run(&cli.config),
        Commands::Check(args) => args.run(&cli.config),
    }
}
