//! # pentasync-sync
//!
//! Digest-gated reconciliation of an output directory against the pages a
//! schedule renders to.
//!
//! Call [`pipeline::run`] to load, index, render and synchronize in one go,
//! or [`synchronize`] with your own desired set of [`Artifact`]s.

pub mod diff;
pub mod digest;
pub mod error;
pub mod pipeline;
pub mod report;
pub mod retry;
pub mod synchronizer;
pub mod tree;
pub mod writer;

pub use diff::{diff_tree, DiffReport, FileDiff};
pub use error::SyncError;
pub use report::{SyncAction, SyncEntry, SyncReport};
pub use retry::RetryPolicy;
pub use synchronizer::{synchronize, SyncOptions};
pub use writer::Artifact;
