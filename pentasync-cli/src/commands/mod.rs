pub mod check;
pub mod diff;
pub mod sync;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use pentasync_core::SiteConfig;

/// Path overrides shared by every command.
#[derive(Args, Debug, Default)]
pub struct SiteArgs {
    /// Root of the YAML entity cache.
    #[arg(long)]
    pub cache_dir: Option<PathBuf>,

    /// Directory the pages are written to.
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Directory of `.html` templates overriding the built-in ones.
    #[arg(long)]
    pub template_dir: Option<PathBuf>,
}

impl SiteArgs {
    /// Load `config_path` and layer the command-line overrides on top.
    pub fn load(self, config_path: &Path) -> Result<SiteConfig> {
        let mut config = SiteConfig::load_at(config_path)
            .with_context(|| format!("failed to load config {}", config_path.display()))?;
        if let Some(dir) = self.cache_dir {
            config.cache_dir = dir;
        }
        if let Some(dir) = self.output_dir {
            config.output_dir = dir;
        }
        if let Some(dir) = self.template_dir {
            config.template_dir = Some(dir);
        }
        tracing::debug!(
            "cache {} → output {}",
            config.cache_dir.display(),
            config.output_dir.display()
        );
        Ok(config)
    }
}
