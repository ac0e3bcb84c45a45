//! Read-only preview of what `sync` would change, as unified diffs.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use similar::TextDiff;

use crate::error::SyncError;
use crate::report::SyncAction;
use crate::synchronizer::validate_targets;
use crate::tree;
use crate::writer::{classify, Artifact};

/// A single rendered file diff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDiff {
    pub path: PathBuf,
    pub unified_diff: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiffReport {
    pub diffs: Vec<FileDiff>,
    /// Files a sync would delete.
    pub orphans: Vec<PathBuf>,
}

impl DiffReport {
    pub fn is_empty(&self) -> bool {
        self.diffs.is_empty() && self.orphans.is_empty()
    }
}

/// Compare `artifacts` to what is under `root`. No files are written.
pub fn diff_tree(root: &Path, artifacts: &[Artifact]) -> Result<DiffReport, SyncError> {
    validate_targets(artifacts)?;

    let mut diffs = Vec::new();
    for artifact in artifacts {
        let target = root.join(&artifact.path);
        let existing = match classify(&target, &artifact.content) {
            SyncAction::Unchanged => continue,
            SyncAction::Updated => std::fs::read(&target).unwrap_or_default(),
            _ => Vec::new(),
        };

        let old_header = format!("a/{}", artifact.path.display());
        let new_header = format!("b/{}", artifact.path.display());
        let old = String::from_utf8_lossy(&existing);
        let new = String::from_utf8_lossy(&artifact.content);
        let unified = TextDiff::from_lines(old.as_ref(), new.as_ref())
            .unified_diff()
            .header(&old_header, &new_header)
            .context_radius(3)
            .to_string();

        diffs.push(FileDiff {
            path: artifact.path.clone(),
            unified_diff: unified,
        });
    }

    let produced: BTreeSet<PathBuf> = artifacts.iter().map(|a| a.path.clone()).collect();
    let orphans = tree::scan_files(root)?
        .difference(&produced)
        .cloned()
        .collect();

    Ok(DiffReport { diffs, orphans })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synchronizer::{synchronize, SyncOptions};
    use std::fs;
    use tempfile::TempDir;

    fn artifacts() -> Vec<Artifact> {
        vec![
            Artifact::new(
                "room/hall_a.html",
                "<h1>Hall A</h1>\n<ul>\n<li>Talk</li>\n</ul>\n",
            ),
            Artifact::new("rooms.html", "<h1>Rooms</h1>\n"),
        ]
    }

    #[test]
    fn no_diffs_after_clean_sync() {
        let out = TempDir::new().unwrap();
        synchronize(out.path(), &artifacts(), &SyncOptions::default()).unwrap();
        let diff = diff_tree(out.path(), &artifacts()).unwrap();
        assert!(diff.is_empty(), "synced tree should have no diff: {diff:?}");
    }

    #[test]
    fn local_edit_produces_unified_diff() {
        let out = TempDir::new().unwrap();
        synchronize(out.path(), &artifacts(), &SyncOptions::default()).unwrap();
        let target = out.path().join("room/hall_a.html");
        let edited = format!("{}manual tweak\n", fs::read_to_string(&target).unwrap());
        fs::write(&target, edited).unwrap();

        let diff = diff_tree(out.path(), &artifacts()).unwrap();
        assert_eq!(diff.diffs.len(), 1);
        let room = &diff.diffs[0];
        assert_eq!(room.path, PathBuf::from("room/hall_a.html"));
        assert!(room.unified_diff.contains("--- a/room/hall_a.html"));
        assert!(room.unified_diff.contains("+++ b/room/hall_a.html"));
        assert!(room.unified_diff.contains("@@"));
        assert!(room.unified_diff.contains("-manual tweak"));
    }

    #[test]
    fn missing_files_and_orphans_are_reported() {
        let out = TempDir::new().unwrap();
        fs::create_dir_all(out.path().join("event")).unwrap();
        fs::write(out.path().join("event/gone.html"), "old").unwrap();

        let diff = diff_tree(out.path(), &artifacts()).unwrap();
        assert_eq!(diff.diffs.len(), 2);
        assert!(diff.diffs[1].unified_diff.contains("+<h1>Rooms</h1>"));
        assert_eq!(diff.orphans, [PathBuf::from("event/gone.html")]);
        let orphan = out.path().join("event/gone.html");
        assert!(orphan.exists(), "diff must not delete");
    }

    #[test]
    fn empty_page_missing_on_disk_is_reported() {
        let out = TempDir::new().unwrap();
        let diff = diff_tree(out.path(), &[Artifact::new("speakers.html", "")]).unwrap();
        assert_eq!(diff.diffs.len(), 1);
        assert_eq!(diff.diffs[0].path, PathBuf::from("speakers.html"));
    }

    #[test]
    fn unreadable_target_diffs_against_nothing() {
        let out = TempDir::new().unwrap();
        fs::create_dir_all(out.path().join("rooms.html")).unwrap();

        let diff = diff_tree(out.path(), &artifacts()).unwrap();
        let rooms = diff
            .diffs
            .iter()
            .find(|d| d.path == Path::new("rooms.html"))
            .unwrap();
        assert!(rooms.unified_diff.contains("+<h1>Rooms</h1>"));
    }
}
