//! Error types for pentasync-renderer.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise while turning a schedule into pages.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Tera template engine error (missing template, missing binding, ...).
    #[error("template engine error: {0}")]
    Tera(#[from] tera::Error),

    /// Filesystem error while loading user templates.
    #[error("template io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The slug boundary could not name an entity.
    #[error("cannot compute slug for {entity}: {reason}")]
    Slug { entity: String, reason: String },

    /// Two pages would be written to the same file.
    #[error("{first} and {second} both render to {path}")]
    DuplicateTarget {
        path: PathBuf,
        first: String,
        second: String,
    },
}
