//! `pentasync.yaml` site configuration.
//!
//! Every key is optional. Relative paths in a config file are resolved
//! against the directory holding that file; built-in defaults stay relative
//! to the working directory.
//!
//! ```yaml
//! cache_dir: tmp/pentacache
//! output_dir: content/schedule
//! template_dir: templates
//! url_prefix: /schedule
//! listings: true
//! jobs: 4
//! retry:
//!   max_attempts: 3
//!   base_delay_ms: 50
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Config file looked up in the working directory when none is given.
pub const DEFAULT_CONFIG_FILE: &str = "pentasync.yaml";

/// Backoff settings for filesystem writes and deletes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RetryConfig {
    pub max_attempts: u32,
    pub base_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_ms: 50,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Root of the YAML entity cache.
    pub cache_dir: PathBuf,
    /// Output root; the only tree the synchronizer may delete from.
    pub output_dir: PathBuf,
    /// Optional directory of `.html` templates overriding the built-in ones.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_dir: Option<PathBuf>,
    /// Prefix of every page URL, without trailing slash.
    pub url_prefix: String,
    /// Render the `rooms`/`tracks`/`events`/`speakers` listing pages.
    pub listings: bool,
    /// Worker count for per-file reconciliation.
    pub jobs: usize,
    pub retry: RetryConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            cache_dir: PathBuf::from("tmp").join("pentacache"),
            output_dir: PathBuf::from("content").join("schedule"),
            template_dir: None,
            url_prefix: "/schedule".to_string(),
            listings: true,
            jobs: 1,
            retry: RetryConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Load from `path`. A missing file yields the defaults.
    pub fn load_at(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::debug!("no config at {}; using defaults", path.display());
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config: SiteConfig = if contents.trim().is_empty() {
            Self::default()
        } else {
            serde_yaml::from_str(&contents).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?
        };
        if let Some(base) = path.parent() {
            config.resolve_relative_to(base);
        }
        config.validate()?;
        Ok(config)
    }

    fn resolve_relative_to(&mut self, base: &Path) {
        let resolve = |p: &Path| {
            if p.is_relative() {
                base.join(p)
            } else {
                p.to_path_buf()
            }
        };
        self.cache_dir = resolve(&self.cache_dir);
        self.output_dir = resolve(&self.output_dir);
        self.template_dir = self.template_dir.as_deref().map(resolve);
    }

    /// Reject values the pipeline cannot honor and normalize the URL prefix.
    pub fn validate(&mut self) -> Result<(), ConfigError> {
        if self.jobs == 0 {
            return Err(ConfigError::Invalid {
                key: "jobs",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.retry.max_attempts == 0 {
            return Err(ConfigError::Invalid {
                key: "retry.max_attempts",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.output_dir.as_os_str().is_empty() {
            return Err(ConfigError::Invalid {
                key: "output_dir",
                reason: "must not be empty".to_string(),
            });
        }
        self.url_prefix = self.url_prefix.trim_end_matches('/').to_string();
        Ok(())
    }
}
