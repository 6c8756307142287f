use clipstack::Clipping;

use crate::controller::actions::{Alert, MenuSnapshot};
use crate::error::AppError;

/// Access to the system pasteboard.
pub trait Pasteboard: Send + Sync {
    /// Current text on the pasteboard, if any.
    fn read_latest(&self) -> Option<String>;

    /// Put `text` on the pasteboard. An `autogenerated` write is one the
    /// engine makes for its own bookkeeping; the watcher must not ingest it
    /// as a new copy.
    fn write_with(&self, text: &str, autogenerated: bool) -> Result<(), AppError>;

    fn write(&self, text: &str) -> Result<(), AppError> {
        self.write_with(text, false)
    }

    /// Returns true, once, when `seen` is the text of the last autogenerated
    /// write.
    fn take_autogenerated(&self, seen: &str) -> bool;
}

/// Emits the platform's "paste" keystroke into the focused application.
pub trait KeystrokeEmitter: Send + Sync {
    fn emit_paste(&self);
}

/// Receiver for everything the menu and overlay layers need to redraw.
pub trait UiSink: Send {
    /// The history changed shape; rebuild the menu from the snapshot.
    fn rebuild(&mut self, menu: &MenuSnapshot);

    /// Show the overlay at `position`. `clipping` is `None` when the history
    /// is empty.
    fn display(&mut self, position: usize, clipping: Option<&Clipping>);

    /// Hide the overlay and resign focus.
    fn dismiss(&mut self);

    /// Ask the user whether to clear all clippings. The answer comes back as
    /// `Action::ClearConfirmation`.
    fn request_clear_confirmation(&mut self);

    fn alert(&mut self, alert: Alert);
}
