//! Error types for pentasync-sync.

use std::path::PathBuf;

use thiserror::Error;

use pentasync_core::{IntegrityError, StoreError};
use pentasync_renderer::RenderError;

/// All errors that can arise from loading, planning, or reconciling.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The entity cache could not be read.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// The schedule references records that do not exist.
    #[error("integrity error: {0}")]
    Integrity(#[from] IntegrityError),

    /// An error from the rendering engine.
    #[error("render error: {0}")]
    Render(#[from] RenderError),

    /// A desired target escapes or names the output root.
    #[error("invalid target path {path}: {reason}")]
    InvalidTarget { path: PathBuf, reason: &'static str },

    /// The reconciliation worker pool could not be started.
    #[error("worker pool: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),

    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience constructor for [`SyncError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> SyncError {
    SyncError::Io {
        path: path.into(),
        source,
    }
}
