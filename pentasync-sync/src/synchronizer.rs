//! Tree-wide reconciliation of an output root against a desired set.

use std::collections::{BTreeSet, HashSet};
use std::path::{Component, Path, PathBuf};
use std::time::Instant;

use rayon::prelude::*;

use crate::error::{io_err, SyncError};
use crate::report::{SyncAction, SyncEntry, SyncReport};
use crate::retry::RetryPolicy;
use crate::tree;
use crate::writer::{reconcile, Artifact};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncOptions {
    pub dry_run: bool,
    /// Workers for per-artifact reconciliation; `1` stays on this thread.
    pub jobs: usize,
    pub retry: RetryPolicy,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            dry_run: false,
            jobs: 1,
            retry: RetryPolicy::default(),
        }
    }
}

/// Reject targets that are not plain relative paths, and duplicates.
pub(crate) fn validate_targets(artifacts: &[Artifact]) -> Result<(), SyncError> {
    let mut seen = HashSet::with_capacity(artifacts.len());
    for artifact in artifacts {
        let path = &artifact.path;
        let invalid = |reason| SyncError::InvalidTarget {
            path: path.clone(),
            reason,
        };
        if path.as_os_str().is_empty() {
            return Err(invalid("empty path"));
        }
        for component in path.components() {
            match component {
                Component::Normal(_) => {}
                Component::CurDir => return Err(invalid("contains '.'")),
                Component::ParentDir => return Err(invalid("contains '..'")),
                Component::RootDir | Component::Prefix(_) => {
                    return Err(invalid("must be relative"))
                }
            }
        }
        if !seen.insert(path) {
            return Err(invalid("listed twice"));
        }
    }
    Ok(())
}

/// Make `root` hold exactly `artifacts`: write what differs, delete files
/// nobody asked for, then prune empty directories.
///
/// Targets are validated before anything is touched. I/O failures abort at
/// the offending path; the tree may be incomplete but no file is ever half
/// written.
pub fn synchronize(
    root: &Path,
    artifacts: &[Artifact],
    options: &SyncOptions,
) -> Result<SyncReport, SyncError> {
    let started = Instant::now();
    validate_targets(artifacts)?;

    if !options.dry_run {
        options
            .retry
            .run("mkdir", root, || std::fs::create_dir_all(root))
            .map_err(|e| io_err(root, e))?;
    }
    let before = tree::scan_files(root)?;

    let actions = reconcile_all(root, artifacts, options)?;
    let mut entries: Vec<SyncEntry> = artifacts
        .iter()
        .zip(actions)
        .map(|(artifact, action)| SyncEntry {
            path: artifact.path.clone(),
            action,
        })
        .collect();

    let produced: BTreeSet<PathBuf> = artifacts.iter().map(|a| a.path.clone()).collect();
    for orphan in before.difference(&produced) {
        if !options.dry_run {
            let full = root.join(orphan);
            match options
                .retry
                .run("delete", &full, || std::fs::remove_file(&full))
            {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(io_err(full, e)),
            }
        }
        tracing::info!("{}deleted: {}", dry_run_tag(options), orphan.display());
        entries.push(SyncEntry {
            path: orphan.clone(),
            action: SyncAction::Deleted,
        });
    }

    let pruned = if options.dry_run {
        tree::predict_pruned(root, &produced)?
    } else {
        tree::prune_empty_dirs(root, &options.retry)?
    };
    entries.extend(pruned.into_iter().map(|path| SyncEntry {
        path,
        action: SyncAction::DirectoryDeleted,
    }));

    let elapsed = started.elapsed();
    tracing::debug!(
        "synchronized {} artifacts under {} in {elapsed:?}",
        artifacts.len(),
        root.display()
    );
    Ok(SyncReport {
        entries,
        dry_run: options.dry_run,
        elapsed,
    })
}

fn dry_run_tag(options: &SyncOptions) -> &'static str {
    if options.dry_run {
        "[dry-run] "
    } else {
        ""
    }
}

/// Per-artifact work; results come back in input order.
fn reconcile_all(
    root: &Path,
    artifacts: &[Artifact],
    options: &SyncOptions,
) -> Result<Vec<SyncAction>, SyncError> {
    let one = |artifact: &Artifact| reconcile(root, artifact, options.dry_run, &options.retry);
    if options.jobs <= 1 || artifacts.len() <= 1 {
        return artifacts.iter().map(one).collect();
    }
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(options.jobs)
        .build()?;
    pool.install(|| artifacts.par_iter().map(one).collect())
}
