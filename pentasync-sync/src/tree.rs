//! Output tree scanning and empty-directory pruning.
//!
//! All returned paths are relative to the output root. The root itself is
//! never listed and never removed.

use std::collections::BTreeSet;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::{io_err, SyncError};
use crate::retry::RetryPolicy;

fn walk(root: &Path) -> impl Iterator<Item = Result<walkdir::DirEntry, SyncError>> + '_ {
    WalkDir::new(root)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .map(move |entry| {
            entry.map_err(|err| {
                let path = err.path().unwrap_or(root).to_path_buf();
                io_err(path, err.into())
            })
        })
}

fn relative(root: &Path, path: &Path) -> PathBuf {
    path.strip_prefix(root).unwrap_or(path).to_path_buf()
}

/// Every non-directory entry below `root`. A missing root is empty.
pub fn scan_files(root: &Path) -> Result<BTreeSet<PathBuf>, SyncError> {
    if !root.is_dir() {
        return Ok(BTreeSet::new());
    }
    let mut files = BTreeSet::new();
    for entry in walk(root) {
        let entry = entry?;
        if !entry.file_type().is_dir() {
            files.insert(relative(root, entry.path()));
        }
    }
    Ok(files)
}

/// Every directory below `root`, parents before children.
pub fn scan_dirs(root: &Path) -> Result<Vec<PathBuf>, SyncError> {
    if !root.is_dir() {
        return Ok(Vec::new());
    }
    let mut dirs = Vec::new();
    for entry in walk(root) {
        let entry = entry?;
        if entry.file_type().is_dir() {
            dirs.push(relative(root, entry.path()));
        }
    }
    Ok(dirs)
}

fn is_empty_dir(path: &Path) -> Result<bool, SyncError> {
    let mut entries = std::fs::read_dir(path).map_err(|e| io_err(path, e))?;
    Ok(entries.next().is_none())
}

/// Remove empty directories below `root` until none remains.
///
/// Each round rescans the tree. The loop stops early, with a warning, if a
/// round does not shrink the directory count.
pub fn prune_empty_dirs(root: &Path, retry: &RetryPolicy) -> Result<Vec<PathBuf>, SyncError> {
    let mut removed = Vec::new();
    let mut previous = usize::MAX;
    loop {
        let dirs = scan_dirs(root)?;
        if dirs.len() >= previous {
            tracing::warn!(
                "directory count under {} stopped shrinking at {}; pruning stops",
                root.display(),
                dirs.len()
            );
            break;
        }
        previous = dirs.len();

        let mut empty = Vec::new();
        for dir in dirs {
            let full = root.join(&dir);
            match is_empty_dir(&full) {
                Ok(true) => empty.push(dir),
                Ok(false) => {}
                // Vanished since the scan.
                Err(SyncError::Io { source, .. }) if source.kind() == ErrorKind::NotFound => {}
                Err(err) => return Err(err),
            }
        }
        if empty.is_empty() {
            break;
        }

        for dir in empty {
            let full = root.join(&dir);
            match retry.run("rmdir", &full, || std::fs::remove_dir(&full)) {
                Ok(()) => {
                    tracing::info!("directory deleted: {}", dir.display());
                    removed.push(dir);
                }
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => {
                    if full.is_dir() && !is_empty_dir(&full)? {
                        tracing::debug!("{} was refilled; keeping it", dir.display());
                    } else {
                        return Err(io_err(full, e));
                    }
                }
            }
        }
    }
    Ok(removed)
}

/// Directories a real run would prune once only `keep` files remain:
/// every directory below `root` that is not an ancestor of a kept file.
pub fn predict_pruned(root: &Path, keep: &BTreeSet<PathBuf>) -> Result<Vec<PathBuf>, SyncError> {
    let ancestors: BTreeSet<&Path> = keep
        .iter()
        .flat_map(|path| path.ancestors().skip(1))
        .filter(|p| !p.as_os_str().is_empty())
        .collect();
    let mut doomed: Vec<PathBuf> = scan_dirs(root)?
        .into_iter()
        .filter(|dir| !ancestors.contains(dir.as_path()))
        .collect();
    // Children first, the order a real prune removes them in.
    doomed.sort_by(|a, b| {
        b.components()
            .count()
            .cmp(&a.components().count())
            .then_with(|| a.cmp(b))
    });
    Ok(doomed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::prelude::*;

    #[test]
    fn missing_root_scans_empty() {
        let tmp = assert_fs::TempDir::new().unwrap();
        let root = tmp.path().join("absent");
        assert!(scan_files(&root).unwrap().is_empty());
        assert!(scan_dirs(&root).unwrap().is_empty());
    }

    #[test]
    fn scan_lists_relative_files_only() {
        let tmp = assert_fs::TempDir::new().unwrap();
        tmp.child("rooms.html").write_str("x").unwrap();
        tmp.child("room/hall_a.html").write_str("x").unwrap();
        tmp.child("empty").create_dir_all().unwrap();

        let files: Vec<_> = scan_files(tmp.path()).unwrap().into_iter().collect();
        assert_eq!(
            files,
            [PathBuf::from("room/hall_a.html"), PathBuf::from("rooms.html")]
        );
        assert_eq!(
            scan_dirs(tmp.path()).unwrap(),
            [PathBuf::from("empty"), PathBuf::from("room")]
        );
    }

    #[test]
    fn nested_empty_dirs_are_pruned_to_fixpoint() {
        let tmp = assert_fs::TempDir::new().unwrap();
        tmp.child("a/b/c").create_dir_all().unwrap();
        tmp.child("x/keep.html").write_str("x").unwrap();

        let removed = prune_empty_dirs(tmp.path(), &RetryPolicy::none()).unwrap();
        assert_eq!(
            removed,
            [PathBuf::from("a/b/c"), PathBuf::from("a/b"), PathBuf::from("a")]
        );
        tmp.child("a").assert(predicates::path::missing());
        tmp.child("x/keep.html").assert(predicates::path::exists());
        assert!(tmp.path().is_dir(), "root must survive");
    }

    #[test]
    fn empty_root_is_kept() {
        let tmp = assert_fs::TempDir::new().unwrap();
        let removed = prune_empty_dirs(tmp.path(), &RetryPolicy::none()).unwrap();
        assert!(removed.is_empty());
        assert!(tmp.path().is_dir());
    }

    #[test]
    fn prediction_keeps_ancestors_of_kept_files() {
        let tmp = assert_fs::TempDir::new().unwrap();
        tmp.child("a/b/c/old.html").write_str("x").unwrap();
        tmp.child("a/keep.html").write_str("x").unwrap();
        tmp.child("z").create_dir_all().unwrap();

        let keep: BTreeSet<PathBuf> = [PathBuf::from("a/keep.html")].into_iter().collect();
        let doomed = predict_pruned(tmp.path(), &keep).unwrap();
        assert_eq!(
            doomed,
            [PathBuf::from("a/b/c"), PathBuf::from("a/b"), PathBuf::from("z")]
        );
        tmp.child("a/b/c/old.html")
            .assert(predicates::path::exists());
    }
}
