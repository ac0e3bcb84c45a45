//! `pentasync diff`: show unified diffs for what sync would write.

use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use pentasync_sync::pipeline;

use super::SiteArgs;

/// Arguments for `pentasync diff`.
#[derive(Args, Debug)]
pub struct DiffArgs {
    #[command(flatten)]
    pub site: SiteArgs,
}

impl DiffArgs {
    pub fn run(self, config_path: &Path) -> Result<()> {
        let config = self.site.load(config_path)?;
        let result = pipeline::diff(&config)
            .with_context(|| format!("diff failed for {}", config.output_dir.display()))?;

        if result.is_empty() {
            println!("No differences in {}.", config.output_dir.display());
            return Ok(());
        }

        for diff in &result.diffs {
            print!("{}", diff.unified_diff);
            if !diff.unified_diff.ends_with('\n') {
                println!();
            }
        }
        for orphan in &result.orphans {
            println!("{} {}", "deleted:".red(), orphan.display());
        }

        Ok(())
    }
}
