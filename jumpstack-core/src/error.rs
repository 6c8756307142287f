//! src/error.rs
//! ============================================================================
//! # `AppError`: Unified Error Type for the clipping daemon
//!
//! Engine failures arrive as [`ClipError`] and are wrapped here; everything
//! the daemon itself touches (config files, the system pasteboard, the action
//! channel) has its own variant with the context needed in a log line.

use clipstack::ClipError;
use std::{io, path::PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    /// Clipping engine error.
    #[error("Clipping engine error: {0}")]
    Clip(#[from] ClipError),

    /// TOML config parsing error.
    #[error("Config parse error: {0}")]
    Config(#[from] toml::de::Error),

    /// TOML config serialization error.
    #[error("Config serialize error: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    /// Config file I/O error with path.
    #[error("Failed to access config file {path:?}: {source}")]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// No home directory to derive config/data locations from.
    #[error("Could not determine the {0} directory")]
    NoProjectDirs(&'static str),

    /// System pasteboard access failed.
    #[error("Pasteboard error: {0}")]
    Pasteboard(String),

    /// The control loop went away while a producer was still sending.
    #[error("Action channel closed")]
    ChannelClosed,
}

impl AppError {
    pub fn pasteboard<S: Into<String>>(message: S) -> Self {
        Self::Pasteboard(message.into())
    }

    pub fn config_io<P: Into<PathBuf>>(path: P, source: io::Error) -> Self {
        Self::ConfigIo {
            path: path.into(),
            source,
        }
    }
}
