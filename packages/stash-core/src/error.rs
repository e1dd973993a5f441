//! Error types for stores, helpers and sessions.

use std::path::PathBuf;

use thiserror::Error;

/// Errors returned by every stash operation.
#[derive(Error, Debug)]
pub enum StashError {
    /// Config file exists but cannot be read or interpreted
    #[error("{} is corrupt. Please delete the file ({reason})", path.display())]
    ConfigCorrupt { path: PathBuf, reason: String },

    /// Tabular file exists but is not valid CSV
    #[error("{} is not valid CSV. Please repair or delete the file ({reason})", path.display())]
    TabularCorrupt { path: PathBuf, reason: String },

    /// Snapshot bytes cannot be decoded into the destination type
    #[error("error decoding '{}' into {type_name}: {reason}", path.display())]
    Decode {
        path: PathBuf,
        type_name: &'static str,
        reason: String,
    },

    /// Value cannot be serialized; nothing was written
    #[error("error encoding '{}': {reason}", path.display())]
    Encode { path: PathBuf, reason: String },

    /// File could not be opened or read
    #[error("error reading file '{}': {source}", path.display())]
    FileUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Disk full during a write
    #[error("disk full while {context} '{}': {source}", path.display())]
    DiskFull {
        path: PathBuf,
        context: &'static str,
        #[source]
        source: std::io::Error,
    },

    /// I/O error that may succeed on retry
    #[error("transient I/O error while {context} '{}': {source}", path.display())]
    TransientIo {
        path: PathBuf,
        context: &'static str,
        #[source]
        source: std::io::Error,
    },

    /// Any other I/O error
    #[error("I/O error while {context} '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        context: &'static str,
        #[source]
        source: std::io::Error,
    },

    /// Input is not an integer
    #[error("unable to transform {0} to an int")]
    InvalidNumber(String),

    /// Input is not an `HH:MM` clock time, or the result does not exist locally
    #[error("invalid clock time '{input}': {reason}")]
    InvalidClockTime { input: String, reason: String },

    /// Lock poisoned (RwLock poisoned)
    #[error("Lock poisoned")]
    LockPoisoned,
}

impl StashError {
    /// Returns true when retrying the same call may succeed.
    ///
    /// Stores never retry on their own; the caller decides.
    pub fn is_transient(&self) -> bool {
        matches!(self, StashError::TransientIo { .. })
    }

    /// Path of the file involved, when the error is file-related.
    pub fn path(&self) -> Option<&std::path::Path> {
        match self {
            StashError::ConfigCorrupt { path, .. }
            | StashError::TabularCorrupt { path, .. }
            | StashError::Decode { path, .. }
            | StashError::Encode { path, .. }
            | StashError::FileUnreadable { path, .. }
            | StashError::DiskFull { path, .. }
            | StashError::TransientIo { path, .. }
            | StashError::Io { path, .. } => Some(path),
            StashError::InvalidNumber(_)
            | StashError::InvalidClockTime { .. }
            | StashError::LockPoisoned => None,
        }
    }
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, StashError>;
