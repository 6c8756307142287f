//! Pasteboard adapters: the system clipboard through `arboard`, and an
//! in-process one for headless runs and tests.

use parking_lot::Mutex;
use tracing::{debug, trace};

use crate::controller::traits::Pasteboard;
use crate::error::AppError;

/// Text of the last autogenerated write, consumed by the watcher.
#[derive(Debug, Default)]
struct AutogeneratedMark(Mutex<Option<String>>);

impl AutogeneratedMark {
    fn record(&self, text: &str, autogenerated: bool) {
        *self.0.lock() = autogenerated.then(|| text.to_owned());
    }

    fn take_if(&self, seen: &str) -> bool {
        let mut mark = self.0.lock();
        if mark.as_deref() == Some(seen) {
            *mark = None;
            true
        } else {
            false
        }
    }
}

/// The system clipboard.
pub struct SystemPasteboard {
    clipboard: Mutex<arboard::Clipboard>,
    mark: AutogeneratedMark,
}

impl SystemPasteboard {
    pub fn new() -> Result<Self, AppError> {
        let clipboard = arboard::Clipboard::new()
            .map_err(|e| AppError::pasteboard(format!("cannot open system clipboard: {e}")))?;
        Ok(Self {
            clipboard: Mutex::new(clipboard),
            mark: AutogeneratedMark::default(),
        })
    }
}

impl Pasteboard for SystemPasteboard {
    fn read_latest(&self) -> Option<String> {
        match self.clipboard.lock().get_text() {
            Ok(text) => Some(text),
            Err(arboard::Error::ContentNotAvailable) => None,
            Err(e) => {
                debug!(error = %e, "Pasteboard read failed");
                None
            }
        }
    }

    fn write_with(&self, text: &str, autogenerated: bool) -> Result<(), AppError> {
        let mut clipboard = self.clipboard.lock();
        let result = if text.is_empty() {
            clipboard.clear()
        } else {
            clipboard.set_text(text.to_owned())
        };
        result.map_err(|e| AppError::pasteboard(e.to_string()))?;

        self.mark.record(text, autogenerated);
        trace!(len = text.len(), autogenerated, "Wrote pasteboard");
        Ok(())
    }

    fn take_autogenerated(&self, seen: &str) -> bool {
        self.mark.take_if(seen)
    }
}

/// Pasteboard kept in memory. Records every write so callers can inspect
/// what the engine placed. An empty write leaves it empty, as clearing the
/// system clipboard does.
#[derive(Debug, Default)]
pub struct MemoryPasteboard {
    contents: Mutex<Option<String>>,
    writes: Mutex<Vec<(String, bool)>>,
    mark: AutogeneratedMark,
}

impl MemoryPasteboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate another application copying `text`.
    pub fn copy_external(&self, text: &str) {
        *self.contents.lock() = Some(text.to_owned());
    }

    /// Every `(text, autogenerated)` pair written so far.
    pub fn writes(&self) -> Vec<(String, bool)> {
        self.writes.lock().clone()
    }
}

impl Pasteboard for MemoryPasteboard {
    fn read_latest(&self) -> Option<String> {
        self.contents.lock().clone()
    }

    fn write_with(&self, text: &str, autogenerated: bool) -> Result<(), AppError> {
        *self.contents.lock() = (!text.is_empty()).then(|| text.to_owned());
        self.writes.lock().push((text.to_owned(), autogenerated));
        self.mark.record(text, autogenerated);
        Ok(())
    }

    fn take_autogenerated(&self, seen: &str) -> bool {
        self.mark.take_if(seen)
    }
}
