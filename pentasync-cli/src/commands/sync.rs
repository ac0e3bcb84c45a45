//! `pentasync sync`: render every page and reconcile the output directory.

use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;
use colored::{ColoredString, Colorize};

use pentasync_sync::{pipeline, SyncAction, SyncReport};

use super::SiteArgs;

/// Arguments for `pentasync sync`.
#[derive(Args, Debug)]
pub struct SyncArgs {
    /// Show what would change without touching the output directory.
    #[arg(long)]
    pub dry_run: bool,

    /// Print the report as JSON.
    #[arg(long)]
    pub json: bool,

    /// Reconcile pages on this many worker threads.
    #[arg(long, short = 'j')]
    pub jobs: Option<usize>,

    #[command(flatten)]
    pub site: SiteArgs,
}

impl SyncArgs {
    pub fn run(self, config_path: &Path) -> Result<()> {
        let mut config = self.site.load(config_path)?;
        if let Some(jobs) = self.jobs {
            config.jobs = jobs;
        }
        config.validate().context("invalid settings")?;

        let report = pipeline::run(&config, self.dry_run)
            .with_context(|| format!("sync failed for {}", config.output_dir.display()))?;

        if self.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&report).context("failed to serialize report")?
            );
            return Ok(());
        }
        print_report(&report);
        Ok(())
    }
}

fn symbol(action: SyncAction) -> ColoredString {
    match action {
        SyncAction::Created => "+".green(),
        SyncAction::Updated => "~".yellow(),
        SyncAction::Unchanged => "·".bright_black(),
        SyncAction::Deleted => "-".red(),
        SyncAction::DirectoryDeleted => "-/".red(),
    }
}

fn print_report(report: &SyncReport) {
    let prefix = if report.dry_run { "[dry-run] " } else { "" };
    for entry in &report.entries {
        println!("{prefix}{} {}", symbol(entry.action), entry.path.display());
    }

    let summary = format!(
        "{} created, {} updated, {} unchanged, {} deleted, {} directories removed",
        report.count(SyncAction::Created),
        report.count(SyncAction::Updated),
        report.count(SyncAction::Unchanged),
        report.count(SyncAction::Deleted),
        report.count(SyncAction::DirectoryDeleted),
    );
    let mark = if report.is_noop() {
        "✓".green()
    } else {
        "✓".bold()
    };
    println!(
        "{prefix}{mark} {summary} in {:.2}s",
        report.elapsed.as_secs_f64()
    );
}
