//! Per-artifact reconciliation.
//!
//! ## `reconcile`: digest-gated atomic write
//!
//! 1. SHA-256 the rendered bytes.
//! 2. Read the existing target; missing or unreadable → create.
//! 3. Equal digests → unchanged, nothing is touched.
//! 4. Create parent directories.
//! 5. Write to `<target>.pentasync.tmp`.
//! 6. Rename over the target (atomic on POSIX).

use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use pentasync_renderer::RenderedPage;

use crate::digest::digest_bytes;
use crate::error::{io_err, SyncError};
use crate::report::SyncAction;
use crate::retry::RetryPolicy;

/// Suffix of the sibling file a target is staged in.
pub const TMP_SUFFIX: &str = ".pentasync.tmp";

/// One rendered output unit: a target path relative to the output root and
/// the bytes it must hold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub path: PathBuf,
    pub content: Vec<u8>,
}

impl Artifact {
    pub fn new(path: impl Into<PathBuf>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }
}

impl From<RenderedPage> for Artifact {
    fn from(page: RenderedPage) -> Self {
        Self::new(page.path, page.content)
    }
}

/// Sibling staging path for `target`.
pub(crate) fn tmp_path(target: &Path) -> PathBuf {
    let mut name = target
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(OsString::new);
    name.push(TMP_SUFFIX);
    target.with_file_name(name)
}

/// Classify `content` against what is at `target` now.
pub(crate) fn classify(target: &Path, content: &[u8]) -> SyncAction {
    match std::fs::read(target) {
        Ok(existing) => {
            if digest_bytes(&existing) == digest_bytes(content) {
                SyncAction::Unchanged
            } else {
                SyncAction::Updated
            }
        }
        Err(err) if err.kind() == ErrorKind::NotFound => SyncAction::Created,
        Err(err) => {
            tracing::warn!("cannot read {} ({err}); treating as new", target.display());
            SyncAction::Created
        }
    }
}

/// Reconcile one artifact below `root`. With `dry_run` nothing is written.
pub(crate) fn reconcile(
    root: &Path,
    artifact: &Artifact,
    dry_run: bool,
    retry: &RetryPolicy,
) -> Result<SyncAction, SyncError> {
    let target = root.join(&artifact.path);
    let action = classify(&target, &artifact.content);

    match action {
        SyncAction::Unchanged => {
            tracing::debug!("unchanged: {}", artifact.path.display());
        }
        _ if dry_run => {
            tracing::info!("[dry-run] {action}: {}", artifact.path.display());
        }
        _ => {
            write_atomic(&target, &artifact.content, retry)?;
            tracing::info!("{action}: {}", artifact.path.display());
        }
    }
    Ok(action)
}

fn write_atomic(target: &Path, content: &[u8], retry: &RetryPolicy) -> Result<(), SyncError> {
    write_atomic_with_tmp(target, content, retry, &tmp_path(target))
}

fn write_atomic_with_tmp(
    target: &Path,
    content: &[u8],
    retry: &RetryPolicy,
    tmp: &Path,
) -> Result<(), SyncError> {
    if let Some(parent) = target.parent() {
        retry
            .run("mkdir", parent, || std::fs::create_dir_all(parent))
            .map_err(|e| io_err(parent, e))?;
    }

    retry
        .run("write", tmp, || std::fs::write(tmp, content))
        .map_err(|e| io_err(tmp, e))?;

    if let Err(e) = retry.run("rename", target, || std::fs::rename(tmp, target)) {
        let _ = std::fs::remove_file(tmp);
        return Err(io_err(target, e));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
