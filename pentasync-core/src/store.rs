//! Entity store boundary and the YAML cache implementation.
//!
//! # Cache layout
//!
//! ```text
//! <cache_dir>/
//!   conf              (single Conference record, optional)
//!   days/<n>          one record per file
//!   events/<n>
//!   rooms/<n>
//!   tracks/<n>
//!   persons/<n>
//!   event_persons/<n>
//!   c_persons/<n>
//! ```
//!
//! Files are read in file-name order. Hidden files and sub-directories are
//! skipped; a missing kind directory is an empty collection. A leading YAML
//! tag on a record (`!conference_room`) is ignored.

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;

use crate::error::{store_io_err, StoreError};
use crate::types::{
    Conference, ConferenceDay, ConferenceProfile, Event, Person, RoleAssignment, Room, Schedule,
    Track,
};

/// A record type the store can load, tied to its cache directory.
pub trait Record: DeserializeOwned {
    /// Directory name under the cache root.
    const COLLECTION: &'static str;
}

impl Record for ConferenceDay {
    const COLLECTION: &'static str = "days";
}
impl Record for Event {
    const COLLECTION: &'static str = "events";
}
impl Record for Room {
    const COLLECTION: &'static str = "rooms";
}
impl Record for Track {
    const COLLECTION: &'static str = "tracks";
}
impl Record for Person {
    const COLLECTION: &'static str = "persons";
}
impl Record for RoleAssignment {
    const COLLECTION: &'static str = "event_persons";
}
impl Record for ConferenceProfile {
    const COLLECTION: &'static str = "c_persons";
}

/// Source of already-deserialized entity collections.
pub trait EntityStore {
    /// All records of one kind, in store order.
    fn load<T: Record>(&self) -> Result<Vec<T>, StoreError>;

    /// The conference record, if the store has one.
    fn conference(&self) -> Result<Option<Conference>, StoreError>;

    /// Load every collection into a [`Schedule`].
    fn load_schedule(&self) -> Result<Schedule, StoreError> {
        Ok(Schedule {
            conference: self.conference()?,
            days: self.load()?,
            rooms: self.load()?,
            tracks: self.load()?,
            events: self.load()?,
            persons: self.load()?,
            role_assignments: self.load()?,
            profiles: self.load()?,
        })
    }
}

/// Reads the directory-per-kind YAML cache.
#[derive(Debug, Clone)]
pub struct YamlCacheStore {
    root: PathBuf,
}

impl YamlCacheStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn record_files(&self, dir: &Path) -> Result<Vec<PathBuf>, StoreError> {
        if !dir.exists() {
            tracing::debug!("cache collection missing: {}", dir.display());
            return Ok(vec![]);
        }
        let mut files = Vec::new();
        for entry in std::fs::read_dir(dir).map_err(|e| store_io_err(dir, e))? {
            let entry = entry.map_err(|e| store_io_err(dir, e))?;
            if entry.file_name().to_string_lossy().starts_with('.') {
                continue;
            }
            // Follows symlinks; a dangling link fails later on read.
            let path = entry.path();
            if path.is_dir() {
                continue;
            }
            files.push(path);
        }
        files.sort();
        Ok(files)
    }
}

fn read_record<T: DeserializeOwned>(path: &Path) -> Result<T, StoreError> {
    let contents = std::fs::read_to_string(path).map_err(|e| store_io_err(path, e))?;
    let parse_err = |source: serde_yaml::Error| StoreError::Parse {
        path: path.to_path_buf(),
        source,
    };
    let value: serde_yaml::Value = serde_yaml::from_str(&contents).map_err(parse_err)?;
    let value = match value {
        serde_yaml::Value::Tagged(tagged) => tagged.value,
        other => other,
    };
    serde_yaml::from_value(value).map_err(parse_err)
}

impl EntityStore for YamlCacheStore {
    fn load<T: Record>(&self) -> Result<Vec<T>, StoreError> {
        let dir = self.root.join(T::COLLECTION);
        let records = self
            .record_files(&dir)?
            .iter()
            .map(|path| read_record::<T>(path))
            .collect::<Result<Vec<T>, _>>()?;
        tracing::debug!(collection = T::COLLECTION, count = records.len(), "loaded");
        Ok(records)
    }

    fn conference(&self) -> Result<Option<Conference>, StoreError> {
        let path = self.root.join("conf");
        if !path.is_file() {
            return Ok(None);
        }
        read_record(&path).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roles::Role;
    use crate::types::RoomId;
    use std::fs;
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str, contents: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    #[test]
    fn missing_cache_is_an_empty_schedule() {
        let tmp = TempDir::new().unwrap();
        let store = YamlCacheStore::new(tmp.path().join("nope"));
        let schedule = store.load_schedule().unwrap();
        assert_eq!(schedule, Schedule::default());
    }

    #[test]
    fn records_load_in_file_name_order() {
        let tmp = TempDir::new().unwrap();
        write(
            tmp.path(),
            "rooms/2",
            "conference_room_id: 2\nconference_room: B\n",
        );
        write(
            tmp.path(),
            "rooms/1",
            "conference_room_id: 1\nconference_room: A\n",
        );
        write(tmp.path(), "rooms/.hidden", "not: a room\n");
        fs::create_dir_all(tmp.path().join("rooms").join("nested")).unwrap();

        let rooms: Vec<Room> = YamlCacheStore::new(tmp.path()).load().unwrap();
        let ids: Vec<_> = rooms.iter().map(|r| r.id.clone()).collect();
        assert_eq!(ids, [RoomId::from("1"), RoomId::from("2")]);
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_records_are_loaded() {
        let tmp = TempDir::new().unwrap();
        write(
            tmp.path(),
            "rooms/1",
            "conference_room_id: R1\nconference_room: A\n",
        );
        write(
            tmp.path(),
            "shared/hall_b",
            "conference_room_id: R2\nconference_room: B\n",
        );
        std::os::unix::fs::symlink(
            tmp.path().join("shared/hall_b"),
            tmp.path().join("rooms/2"),
        )
        .unwrap();

        let rooms: Vec<Room> = YamlCacheStore::new(tmp.path()).load().unwrap();
        let ids: Vec<_> = rooms.iter().map(|r| r.id.clone()).collect();
        assert_eq!(ids, [RoomId::from("R1"), RoomId::from("R2")]);
    }

    #[cfg(unix)]
    #[test]
    fn dangling_record_link_is_an_error() {
        let tmp = TempDir::new().unwrap();
        write(
            tmp.path(),
            "rooms/1",
            "conference_room_id: R1\nconference_room: A\n",
        );
        std::os::unix::fs::symlink(tmp.path().join("gone"), tmp.path().join("rooms/2")).unwrap();

        let err = YamlCacheStore::new(tmp.path()).load::<Room>().unwrap_err();
        assert!(matches!(err, StoreError::Io { .. }), "got: {err}");
    }

    #[test]
    fn tagged_records_are_untagged() {
        let tmp = TempDir::new().unwrap();
        write(
            tmp.path(),
            "event_persons/1",
            "--- !event_persons\nevent_id: 5\nperson_id: 9\nevent_role: speaker\nevent_role_state: confirmed\n",
        );
        let assignments: Vec<RoleAssignment> = YamlCacheStore::new(tmp.path()).load().unwrap();
        assert_eq!(assignments.len(), 1);
        assert_eq!(assignments[0].role, Role::Speaker);
    }

    #[test]
    fn conference_record_is_optional() {
        let tmp = TempDir::new().unwrap();
        let store = YamlCacheStore::new(tmp.path());
        assert!(store.conference().unwrap().is_none());

        write(

            tmp.path(),

            "conf",

            "title: FOSDEM 2012\nacronym: fosdem2012\n",

        );
        let conf = store.conference().unwrap().unwrap();
        assert_eq!(conf.title, "FOSDEM 2012");
    }

    #[test]
    fn parse_error_names_the_record_file() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "tracks/7", "conference_track_id: [unclosed\n");
        let err = YamlCacheStore::new(tmp.path())
            .load::<Track>()
            .unwrap_err();
        assert!(matches!(err, StoreError::Parse { .. }), "got: {err}");
        assert!(err.to_string().contains("tracks"), "got: {err}");
    }
}
