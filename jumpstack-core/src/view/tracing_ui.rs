//! Headless UI: menu rebuilds, overlay frames and alerts become log events.

use clipstack::Clipping;
use tracing::{error, info, warn};

use crate::controller::actions::{Alert, MenuSnapshot};
use crate::controller::traits::{KeystrokeEmitter, UiSink};

#[derive(Debug, Default)]
pub struct TracingUi;

impl TracingUi {
    pub fn new() -> Self {
        Self
    }
}

impl UiSink for TracingUi {
    fn rebuild(&mut self, menu: &MenuSnapshot) {
        if menu.is_empty() {
            info!(target: "jumpstack::menu", "Menu rebuilt: no clippings");
        } else {
            for entry in &menu.entries {
                info!(target: "jumpstack::menu", slot = entry.slot, "{}", entry.title);
            }
        }
    }

    fn display(&mut self, position: usize, clipping: Option<&Clipping>) {
        match clipping {
            Some(clip) => info!(
                target: "jumpstack::bezel",
                position,
                len = clip.full_text().len(),
                "{}",
                clip.preview()
            ),
            None => info!(target: "jumpstack::bezel", "Overlay shown with empty history"),
        }
    }

    fn dismiss(&mut self) {
        info!(target: "jumpstack::bezel", "Overlay dismissed");
    }

    fn request_clear_confirmation(&mut self) {
        warn!(
            target: "jumpstack::menu",
            "Clear all clippings? Answer with `yes`, `no` or `always`"
        );
    }

    fn alert(&mut self, alert: Alert) {
        match alert {
            Alert::CannotSave { reason } => {
                error!(%reason, "Clippings could not be saved; history is kept in memory");
            }
            Alert::CannotLoad { reason } => {
                error!(%reason, "Saved clippings could not be loaded; starting empty");
            }
            Alert::ClearBeforeTogglingSave { enable } => {
                warn!(
                    enable,
                    "Clear all clippings before turning history saving {}",
                    if enable { "on" } else { "off" }
                );
            }
            Alert::PasteboardUnavailable { reason } => {
                error!(%reason, "Pasteboard unavailable");
            }
        }
    }
}

/// Stands in for a platform key synthesizer: records that a paste would be
/// sent to the focused application.
#[derive(Debug, Default)]
pub struct LoggingKeystrokes;

impl KeystrokeEmitter for LoggingKeystrokes {
    fn emit_paste(&self) {
        info!(target: "jumpstack::paste", "Paste keystroke emitted");
    }
}

