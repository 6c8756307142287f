use crate::error::{ClipError, ClipResult};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Smallest history the store will keep.
pub const MIN_CAPACITY: usize = 10;

pub const DEFAULT_CAPACITY: usize = 99;

pub const DEFAULT_DISPLAY_NUM: usize = 10;

/// Texts longer than this (in bytes) are dropped when large clippings are
/// ignored.
pub const LARGE_CLIPPING_BYTES: usize = 512 * 1024;

/// Which texts the store accepts on `add` and on load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcceptPolicy {
    /// Drop whitespace-only text
    pub ignore_blank: bool,

    /// Drop text longer than [`LARGE_CLIPPING_BYTES`]
    pub ignore_large: bool,
}

impl Default for AcceptPolicy {
    fn default() -> Self {
        Self {
            ignore_blank: true,
            ignore_large: true,
        }
    }
}

impl AcceptPolicy {
    pub fn accepts(&self, text: &str) -> bool {
        if self.ignore_blank && text.trim().is_empty() {
            return false;
        }
        if self.ignore_large && text.len() > LARGE_CLIPPING_BYTES {
            return false;
        }
        true
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Maximum number of clippings remembered
    pub capacity: usize,

    /// Number of clippings the menu shows; written to the saved file as a hint
    pub display_num: usize,

    /// Save the history after every change and restore it on start
    pub persist: bool,

    /// Location of the saved history
    pub store_file: Option<PathBuf>,

    pub accept: AcceptPolicy,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            display_num: DEFAULT_DISPLAY_NUM,
            persist: true,
            store_file: None,
            accept: AcceptPolicy::default(),
        }
    }
}

impl StoreConfig {
    /// In-memory only configuration, used by tests and by `skip_save`.
    pub fn ephemeral() -> Self {
        Self {
            persist: false,
            ..Self::default()
        }
    }

    pub fn with_store_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.store_file = Some(path.into());
        self.persist = true;
        self
    }

    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn effective_capacity(&self) -> usize {
        clamp_capacity(self.capacity)
    }

    pub fn validate(&self) -> ClipResult<()> {
        if self.persist && self.store_file.is_none() {
            return Err(ClipError::ConfigError(
                "persistence is enabled but no clippings file is set".into(),
            ));
        }
        Ok(())
    }
}

#[inline]
pub fn clamp_capacity(capacity: usize) -> usize {
    capacity.max(MIN_CAPACITY)
}
