//! Shared pipeline entrypoints used by the CLI: cache → index → pages → tree.

use pentasync_core::{EntityStore, ScheduleIndex, SiteConfig, YamlCacheStore};
use pentasync_renderer::{SiteOptions, SitePlanner, TemplateEngine};

use crate::diff::{diff_tree, DiffReport};
use crate::report::SyncReport;
use crate::retry::RetryPolicy;
use crate::synchronizer::{synchronize, SyncOptions};
use crate::writer::Artifact;
use crate::SyncError;

/// Load the cache and render every page into the desired set.
///
/// Touches nothing under the output root; integrity and template errors
/// surface here, before any write.
pub fn plan(config: &SiteConfig) -> Result<Vec<Artifact>, SyncError> {
    let store = YamlCacheStore::new(&config.cache_dir);
    plan_from(&store, config)
}

/// [`plan`] with a caller-supplied entity store.
pub fn plan_from<S: EntityStore>(
    store: &S,
    config: &SiteConfig,
) -> Result<Vec<Artifact>, SyncError> {
    let schedule = store.load_schedule()?;
    let index = ScheduleIndex::build(&schedule)?;
    let engine = TemplateEngine::new(config.template_dir.as_deref())?;
    let options = SiteOptions {
        url_prefix: config.url_prefix.clone(),
        listings: config.listings,
    };
    let pages = SitePlanner::new(&engine, options).plan(&index)?;
    Ok(pages.into_iter().map(Artifact::from).collect())
}

/// Plan and synchronize the output root.
pub fn run(config: &SiteConfig, dry_run: bool) -> Result<SyncReport, SyncError> {
    let artifacts = plan(config)?;
    let options = SyncOptions {
        dry_run,
        jobs: config.jobs,
        retry: RetryPolicy::from(&config.retry),
    };
    synchronize(&config.output_dir, &artifacts, &options)
}

/// Plan and diff against the output root without writing.
pub fn diff(config: &SiteConfig) -> Result<DiffReport, SyncError> {
    let artifacts = plan(config)?;
    diff_tree(&config.output_dir, &artifacts)
}
