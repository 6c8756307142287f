//! src/controller/actions.rs
//! ============================================================================
//! # Actions: everything the control loop reacts to
//!
//! Producers (pasteboard watcher, overlay key capture, menu, preferences)
//! never touch the clipping stack directly; they send an [`Action`] and the
//! control loop applies it through the dispatcher, one at a time.

use clipstack::Clipping;

use crate::config::Settings;

/// Number of clippings a page key moves over.
pub const PAGE_SIZE: isize = 10;

/// Keys the overlay understands while it is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BezelKey {
    /// One step toward older clippings; Shift reverses it. The hotkey's own
    /// key arrives as this one.
    Advance { shift: bool },

    /// One step toward newer clippings; Shift reverses it.
    Retreat { shift: bool },

    PageDown,

    PageUp,

    Home,

    End,

    /// Digit keys: `1`..=`9` select slots 0..=8, `0` selects slot 9.
    Digit(u8),

    Delete,

    Confirm,

    Cancel,
}

impl BezelKey {
    /// Slot a digit key jumps to, before clamping to the history length.
    pub fn slot(self) -> Option<usize> {
        match self {
            BezelKey::Digit(0) => Some(9),
            BezelKey::Digit(d @ 1..=9) => Some(usize::from(d) - 1),
            _ => None,
        }
    }
}

/// Represents a high-level action that the application can perform.
#[derive(Debug, Clone)]
pub enum Action {
    /// The system pasteboard now holds this text.
    PasteboardChanged(String),

    /// The global hotkey was pressed.
    HotkeyPressed,

    /// All hotkey modifiers were released while the overlay was shown.
    ModifiersReleased,

    /// A key was pressed while the overlay was shown.
    BezelKey(BezelKey),

    /// A clipping was chosen from the menu. `alternate` is set when the
    /// configured modifier inverts the paste behavior.
    MenuSelect { slot: usize, alternate: bool },

    /// "Copy to pasteboard" on a menu clipping.
    MenuPlace(usize),

    /// "Paste" on a menu clipping.
    MenuPaste(usize),

    /// "Delete item" on a menu clipping.
    MenuDelete(usize),

    /// "Clear All" from the menu.
    ClearAll,

    /// Answer to a clear confirmation request.
    ClearConfirmation { confirmed: bool, dont_ask_again: bool },

    /// Preferences were edited.
    SettingsChanged(Box<Settings>),

    /// Stop the control loop.
    Quit,
}

impl Action {
    /// Short name for log fields; never includes clipping text.
    pub fn kind(&self) -> &'static str {
        match self {
            Action::PasteboardChanged(_) => "pasteboard_changed",
            Action::HotkeyPressed => "hotkey_pressed",
            Action::ModifiersReleased => "modifiers_released",
            Action::BezelKey(_) => "bezel_key",
            Action::MenuSelect { .. } => "menu_select",
            Action::MenuPlace(_) => "menu_place",
            Action::MenuPaste(_) => "menu_paste",
            Action::MenuDelete(_) => "menu_delete",
            Action::ClearAll => "clear_all",
            Action::ClearConfirmation { .. } => "clear_confirmation",
            Action::SettingsChanged(_) => "settings_changed",
            Action::Quit => "quit",
        }
    }
}

/// Result of applying one action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchResult {
    Continue,

    /// The dispatcher changed a setting itself; it should be saved.
    SettingsUpdated,

    Quit,
}

/// A menu entry: the slot it selects and the text it shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuEntry {
    pub slot: usize,
    pub title: String,
}

/// Everything the menu layer needs to rebuild itself.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MenuSnapshot {
    pub entries: Vec<MenuEntry>,
}

impl MenuSnapshot {
    pub fn from_clippings(clippings: &[Clipping]) -> Self {
        let entries = clippings
            .iter()
            .enumerate()
            .map(|(slot, clip)| MenuEntry {
                slot,
                title: clip.preview().to_owned(),
            })
            .collect();

        Self { entries }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// User-facing problems the dispatcher surfaces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Alert {
    /// The clippings file could not be written.
    CannotSave { reason: String },

    /// The clippings file could not be read at start-up.
    CannotLoad { reason: String },

    /// Persistence can only be switched with an empty history.
    ClearBeforeTogglingSave { enable: bool },

    /// Writing to the system pasteboard failed.
    PasteboardUnavailable { reason: String },
}
