//! Error types for pentasync-core.

use std::path::PathBuf;

use thiserror::Error;

/// Referential integrity violations found while indexing a schedule.
///
/// Every variant names the referencing entity and the missing or clashing id.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntegrityError {
    #[error("event {event} for room {room} that doesn't exist")]
    MissingRoom { event: String, room: String },

    #[error("event {event} for track {track} that doesn't exist")]
    MissingTrack { event: String, track: String },

    #[error("role assignment of person {person} for event {event} that doesn't exist")]
    MissingEvent { person: String, event: String },

    #[error("role assignment on event {event} for person {person} that doesn't exist")]
    MissingPerson { event: String, person: String },

    #[error("duplicate {kind} id {id}")]
    DuplicateId { kind: &'static str, id: String },
}

/// Failures reading the entity cache.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// YAML parse error, with the offending record file.
    #[error("failed to parse cache record {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

/// Failures loading `pentasync.yaml`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error reading config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid config value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

pub(crate) fn store_io_err(path: impl Into<PathBuf>, source: std::io::Error) -> StoreError {
    StoreError::Io {
        path: path.into(),
        source,
    }
}
