use crate::clipping::Clipping;
use crate::config::{AcceptPolicy, StoreConfig, clamp_capacity};
use crate::error::{ClipError, ClipResult};
use crate::persistence::{SavedEngine, StoreFile};
use std::path::Path;
use tracing::{debug, error, info, warn};

/// Bounded, newest-first history of clippings.
///
/// Every mutation rewrites the clippings file in full when persistence is on.
/// Load and save failures never escape: they are logged, kept in
/// [`ClippingStore::last_persistence_error`] and the store keeps working in
/// memory.
#[derive(Debug)]
pub struct ClippingStore {
    items: Vec<Clipping>,
    capacity: usize,
    display_num: usize,
    accept: AcceptPolicy,
    file: Option<StoreFile>,
    persist: bool,
    last_error: Option<ClipError>,
}

impl ClippingStore {
    /// Build a store and restore the previous session when persistence is on.
    pub fn open(config: StoreConfig) -> ClipResult<Self> {
        config.validate()?;

        let mut store = Self {
            items: Vec::new(),
            capacity: config.effective_capacity(),
            display_num: config.display_num,
            accept: config.accept,
            file: config.store_file.map(StoreFile::new),
            persist: config.persist,
            last_error: None,
        };

        if store.persist {
            store.load();
        }
        Ok(store)
    }

    /// Store that never touches the disk.
    pub fn in_memory(capacity: usize) -> Self {
        Self {
            items: Vec::new(),
            capacity: clamp_capacity(capacity),
            display_num: StoreConfig::default().display_num,
            accept: AcceptPolicy::default(),
            file: None,
            persist: false,
            last_error: None,
        }
    }

    fn load(&mut self) {
        let Some(file) = self.file.clone() else {
            return;
        };

        match file.load() {
            Ok(Some(saved)) => {
                // Replaying through `insert` keeps capacity and the accept
                // policy in force without writing the file once per entry.
                for text in saved.replay_order() {
                    self.insert(text);
                }
                info!(
                    path = %file.path().display(),
                    restored = self.items.len(),
                    stored = saved.jc_list.len(),
                    "Restored clippings"
                );
            }
            Ok(None) => {}
            Err(e) => {
                error!(path = %file.path().display(), error = %e, "Unable to load clippings file");
                self.items.clear();
                self.last_error = Some(e);
            }
        }
    }

    fn insert(&mut self, text: &str) -> bool {
        if !self.accept.accepts(text) {
            debug!(len = text.len(), "Clipping rejected by accept policy");
            return false;
        }

        self.items.insert(0, Clipping::new(text));
        if self.items.len() > self.capacity {
            self.items.pop();
        }
        true
    }

    fn write(&mut self) {
        if !self.persist {
            return;
        }
        let Some(file) = self.file.as_ref() else {
            return;
        };

        let saved = SavedEngine::from_clippings(&self.items, self.display_num, self.capacity);
        match file.save(&saved) {
            Ok(()) => self.last_error = None,
            Err(e) => {
                warn!(path = %file.path().display(), error = %e, "Unable to write clippings file");
                self.last_error = Some(e);
            }
        }
    }

    /// Insert `text` at the head, evicting the oldest entry when full.
    /// Returns false when the accept policy rejected the text.
    pub fn add(&mut self, text: &str) -> bool {
        let inserted = self.insert(text);
        if inserted {
            self.write();
        }
        inserted
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.write();
    }

    pub fn item_at(&self, position: usize) -> Option<&Clipping> {
        self.items.get(position)
    }

    pub fn remove_at(&mut self, position: usize) -> Option<Clipping> {
        if position >= self.items.len() {
            return None;
        }
        let removed = self.items.remove(position);
        self.write();
        Some(removed)
    }

    /// Move the clipping at `position` to the head. The head itself and
    /// out-of-range positions are left alone.
    pub fn move_to_top(&mut self, position: usize) -> bool {
        if position == 0 || position >= self.items.len() {
            return false;
        }
        let clip = self.items.remove(position);
        self.items.insert(0, clip);
        self.write();
        true
    }

    pub fn first_n(&self, n: usize) -> &[Clipping] {
        &self.items[..n.min(self.items.len())]
    }

    /// Change the capacity (never below the floor), evicting from the tail.
    pub fn set_capacity(&mut self, capacity: usize) {
        let capacity = clamp_capacity(capacity);
        if capacity == self.capacity {
            return;
        }

        self.capacity = capacity;
        if self.items.len() > capacity {
            debug!(evicted = self.items.len() - capacity, capacity, "Shrinking clipping store");
            self.items.truncate(capacity);
            self.write();
        }
    }

    pub fn set_accept_policy(&mut self, accept: AcceptPolicy) {
        self.accept = accept;
    }

    pub fn set_display_hint(&mut self, display_num: usize) {
        self.display_num = display_num;
    }

    /// Turn persistence on or off. Only allowed while the store is empty, so
    /// that neither the saved history nor the in-memory one is silently lost.
    pub fn set_persistence_enabled(&mut self, enable: bool) -> ClipResult<()> {
        if enable == self.persist {
            return Ok(());
        }
        if !self.items.is_empty() {
            return Err(ClipError::PersistenceToggleRefused { enable });
        }
        if enable && self.file.is_none() {
            return Err(ClipError::ConfigError("no clippings file configured".into()));
        }

        self.persist = enable;
        info!(enabled = enable, "Clipping persistence toggled");
        // Starting to save with an empty store wipes whatever was on disk.
        self.write();
        Ok(())
    }

    pub fn persistence_enabled(&self) -> bool {
        self.persist
    }

    pub fn store_path(&self) -> Option<&Path> {
        self.file.as_ref().map(StoreFile::path)
    }

    pub fn last_persistence_error(&self) -> Option<&ClipError> {
        self.last_error.as_ref()
    }

    pub fn take_persistence_error(&mut self) -> Option<ClipError> {
        self.last_error.take()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn iter(&self) -> impl Iterator<Item = &Clipping> {
        self.items.iter()
    }
}
