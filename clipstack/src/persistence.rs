//! Durable clippings file
//!
//! The history is kept as one JSON record rewritten in full after each change:
//!
//! - Entries are stored head-first, each tagged with its 0-based position
//! - Loading replays them oldest-first through the normal `add` path
//! - Saves go through a temporary file and an atomic rename

use crate::clipping::Clipping;
use crate::error::{ClipError, ClipResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

/// Type tag carried by every saved entry for compatibility with older files.
pub const LEGACY_TYPE_TAG: &str = "NSStringPboardType";

/// Default file name of the clippings file inside the data directory.
pub const STORE_FILE_NAME: &str = "JCEngine.save";

/// Serialized form of the whole store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedEngine {
    /// Only written by very old versions; kept so their files still parse
    #[serde(default)]
    pub display_len: Option<i64>,

    pub display_num: i64,

    pub jc_list: Vec<SavedItem>,

    pub remember_num: i64,

    pub version: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedItem {
    #[serde(rename = "Contents")]
    pub contents: String,

    #[serde(rename = "Position")]
    pub position: i64,

    #[serde(rename = "Type", default = "legacy_type_tag")]
    pub kind: String,
}

fn legacy_type_tag() -> String {
    LEGACY_TYPE_TAG.to_owned()
}

impl SavedEngine {
    /// Snapshot the given clippings in their current, newest-first order.
    pub fn from_clippings<'a>(
        clippings: impl IntoIterator<Item = &'a Clipping>,
        display_num: usize,
        remember_num: usize,
    ) -> Self {
        let jc_list = clippings
            .into_iter()
            .enumerate()
            .map(|(position, clip)| SavedItem {
                contents: clip.full_text().to_owned(),
                position: to_i64(position),
                kind: legacy_type_tag(),
            })
            .collect();

        Self {
            display_len: None,
            display_num: to_i64(display_num),
            jc_list,
            remember_num: to_i64(remember_num),
            version: env!("CARGO_PKG_VERSION").to_owned(),
        }
    }

    /// Texts in the order they must be re-added: oldest first.
    pub fn replay_order(&self) -> impl Iterator<Item = &str> {
        self.jc_list.iter().rev().map(|item| item.contents.as_str())
    }
}

fn to_i64(value: usize) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

/// Reads and atomically rewrites a single clippings file.
#[derive(Debug, Clone)]
pub struct StoreFile {
    path: PathBuf,
    temp_path: PathBuf,
}

impl StoreFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let temp_path = path.with_extension("tmp");

        Self { path, temp_path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the saved record. A missing file is not an error: there is simply
    /// no previous session.
    pub fn load(&self) -> ClipResult<Option<SavedEngine>> {
        let data = match fs::read(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No clippings file yet");
                return Ok(None);
            }
            Err(e) => return Err(ClipError::read_error(&self.path, &e)),
        };

        let saved: SavedEngine = serde_json::from_slice(&data)
            .map_err(|e| ClipError::corrupted(&self.path, e))?;

        trace!(
            path = %self.path.display(),
            entries = saved.jc_list.len(),
            version = %saved.version,
            "Read clippings file"
        );
        Ok(Some(saved))
    }

    pub fn save(&self, saved: &SavedEngine) -> ClipResult<()> {
        let data = serde_json::to_vec_pretty(saved)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| ClipError::write_error(parent, &e))?;
            }
        }

        fs::write(&self.temp_path, &data).map_err(|e| ClipError::write_error(&self.temp_path, &e))?;
        fs::rename(&self.temp_path, &self.path).map_err(|e| {
            let _ = fs::remove_file(&self.temp_path);
            ClipError::write_error(&self.path, &e)
        })?;

        trace!(path = %self.path.display(), bytes = data.len(), "Wrote clippings file");
        Ok(())
    }
}
