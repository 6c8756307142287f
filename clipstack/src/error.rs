//! Error handling for the clipping engine.
//!
//! Nothing in the engine is fatal: every variant here is either recovered
//! locally by the store (persistence) or reported back to the caller of a
//! configuration change.

use compact_str::CompactString;
use std::io::ErrorKind;
use std::path::Path;
use thiserror::Error;

pub type ClipResult<T> = Result<T, ClipError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClipError {
    #[error("Failed to read clippings file {path}: {kind:?}")]
    PersistenceRead { path: CompactString, kind: ErrorKind },

    #[error("Failed to write clippings file {path}: {kind:?}")]
    PersistenceWrite { path: CompactString, kind: ErrorKind },

    #[error("Clippings file corrupted: {path}: {reason}")]
    PersistenceCorrupted {
        path: CompactString,
        reason: CompactString,
    },

    #[error("Serialization error: {0}")]
    SerializationError(CompactString),

    #[error("Clipping store configuration error: {0}")]
    ConfigError(CompactString),

    /// Switching persistence on or off with clippings in memory would either
    /// drop them from disk or overwrite the saved history.
    #[error("Clear all clippings before turning persistence {}", on_off(.enable))]
    PersistenceToggleRefused { enable: bool },
}

fn on_off(enable: &bool) -> &'static str {
    if *enable { "on" } else { "off" }
}

impl ClipError {
    #[inline]
    pub fn is_persistence_error(&self) -> bool {
        matches!(
            self,
            ClipError::PersistenceRead { .. }
                | ClipError::PersistenceWrite { .. }
                | ClipError::PersistenceCorrupted { .. }
                | ClipError::SerializationError(_)
        )
    }

    #[inline]
    pub fn read_error(path: &Path, io_error: &std::io::Error) -> Self {
        Self::PersistenceRead {
            path: CompactString::from(path.to_string_lossy()),
            kind: io_error.kind(),
        }
    }

    #[inline]
    pub fn write_error(path: &Path, io_error: &std::io::Error) -> Self {
        Self::PersistenceWrite {
            path: CompactString::from(path.to_string_lossy()),
            kind: io_error.kind(),
        }
    }

    #[inline]
    pub fn corrupted(path: &Path, reason: impl std::fmt::Display) -> Self {
        Self::PersistenceCorrupted {
            path: CompactString::from(path.to_string_lossy()),
            reason: CompactString::from(reason.to_string()),
        }
    }
}

impl From<serde_json::Error> for ClipError {
    fn from(err: serde_json::Error) -> Self {
        ClipError::SerializationError(CompactString::from(err.to_string()))
    }
}
