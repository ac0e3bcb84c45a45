//! What a synchronization did, per path.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Serialize, Serializer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncAction {
    Created,
    Updated,
    Unchanged,
    Deleted,
    DirectoryDeleted,
}

impl fmt::Display for SyncAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncAction::Created => write!(f, "created"),
            SyncAction::Updated => write!(f, "updated"),
            SyncAction::Unchanged => write!(f, "unchanged"),
            SyncAction::Deleted => write!(f, "deleted"),
            SyncAction::DirectoryDeleted => write!(f, "directory deleted"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncEntry {
    /// Relative to the output root.
    pub path: PathBuf,
    pub action: SyncAction,
}

/// Artifact entries in desired-set order, then deleted files sorted by path,
/// then deleted directories in removal order.
#[derive(Debug, Clone, Serialize)]
pub struct SyncReport {
    pub entries: Vec<SyncEntry>,
    pub dry_run: bool,
    #[serde(rename = "elapsed_secs", serialize_with = "as_secs")]
    pub elapsed: Duration,
}

fn as_secs<S: Serializer>(elapsed: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(elapsed.as_secs_f64())
}

impl SyncReport {
    pub fn count(&self, action: SyncAction) -> usize {
        self.entries.iter().filter(|e| e.action == action).count()
    }

    /// Entries that touched (or would touch) the filesystem.
    pub fn changes(&self) -> impl Iterator<Item = &SyncEntry> {
        self.entries
            .iter()
            .filter(|e| e.action != SyncAction::Unchanged)
    }

    pub fn is_noop(&self) -> bool {
        self.changes().next().is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(path: &str, action: SyncAction) -> SyncEntry {
        SyncEntry {
            path: PathBuf::from(path),
            action,
        }
    }

    #[test]
    fn counts_and_noop() {
        let report = SyncReport {
            entries: vec![
                entry("a.html", SyncAction::Unchanged),
                entry("b.html", SyncAction::Created),
                entry("old", SyncAction::DirectoryDeleted),
            ],
            dry_run: false,
            elapsed: Duration::from_millis(1500),
        };
        assert_eq!(report.count(SyncAction::Created), 1);
        assert_eq!(report.count(SyncAction::Updated), 0);
        assert_eq!(report.changes().count(), 2);
        assert!(!report.is_noop());
    }

    #[test]
    fn serializes_snake_case_actions() {
        let report = SyncReport {
            entries: vec![entry("old", SyncAction::DirectoryDeleted)],
            dry_run: true,
            elapsed: Duration::from_millis(250),
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["entries"][0]["action"], "directory_deleted");
        assert_eq!(json["entries"][0]["path"], "old");
        assert_eq!(json["dry_run"], true);
        assert_eq!(json["elapsed_secs"], 0.25);
    }
}
