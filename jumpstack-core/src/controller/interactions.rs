//! src/controller/interactions.rs
//! ============================================================================
//! # InteractionDispatcher: applies actions to the clipping stack
//!
//! Owns the stack (and through it the store) and the injected settings.
//! Every side effect goes out through a collaborator: the pasteboard, the
//! keystroke emitter for deferred pastes, and the UI sink for menu rebuilds,
//! overlay display and alerts.

use std::sync::Arc;

use clipstack::ClippingStack;
use tracing::{debug, info, instrument, trace, warn};

use crate::config::Settings;
use crate::controller::actions::{Action, Alert, BezelKey, DispatchResult, MenuSnapshot, PAGE_SIZE};
use crate::controller::traits::{KeystrokeEmitter, Pasteboard, UiSink};
use crate::util::deferred::DeferredTask;

pub struct InteractionDispatcher {
    stack: ClippingStack,
    settings: Settings,
    pasteboard: Arc<dyn Pasteboard>,
    keystrokes: Arc<dyn KeystrokeEmitter>,
    ui: Box<dyn UiSink>,
    deferred_paste: DeferredTask,
    bezel_shown: bool,
    clear_pending: bool,
    save_failure_reported: bool,
}

impl InteractionDispatcher {
    pub fn new(
        stack: ClippingStack,
        settings: Settings,
        pasteboard: Arc<dyn Pasteboard>,
        keystrokes: Arc<dyn KeystrokeEmitter>,
        ui: Box<dyn UiSink>,
    ) -> Self {
        let stack = stack.with_wraparound(settings.wraparound_bezel);
        let deferred_paste = DeferredTask::new(settings.paste_delay);
        Self {
            stack,
            settings,
            pasteboard,
            keystrokes,
            ui,
            deferred_paste,
            bezel_shown: false,
            clear_pending: false,
            save_failure_reported: false,
        }
    }

    /// Build the first menu and report a clippings file that could not be
    /// restored.
    pub fn start(&mut self) {
        if let Some(err) = self.stack.store_mut().take_persistence_error() {
            self.ui.alert(Alert::CannotLoad {
                reason: err.to_string(),
            });
        }
        self.rebuild();
    }

    pub fn stack(&self) -> &ClippingStack {
        &self.stack
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn bezel_shown(&self) -> bool {
        self.bezel_shown
    }

    #[instrument(level = "debug", skip_all, fields(action = action.kind()))]
    pub fn handle(&mut self, action: Action) -> DispatchResult {
        let result = match action {
            Action::PasteboardChanged(text) => {
                self.ingest(&text);
                DispatchResult::Continue
            }
            Action::HotkeyPressed => {
                self.hotkey_pressed();
                DispatchResult::Continue
            }
            Action::ModifiersReleased => {
                if self.bezel_shown && !self.settings.sticky_bezel {
                    self.confirm_selection();
                }
                DispatchResult::Continue
            }
            Action::BezelKey(key) => {
                self.bezel_key(key);
                DispatchResult::Continue
            }
            Action::MenuSelect { slot, alternate } => {
                let paste = self.settings.menu_selection_pastes != alternate;
                self.menu_choose(slot, paste, self.settings.menu_selection_moves_to_top);
                DispatchResult::Continue
            }
            Action::MenuPlace(slot) => {
                self.menu_choose(slot, false, false);
                DispatchResult::Continue
            }
            Action::MenuPaste(slot) => {
                self.menu_choose(slot, true, false);
                DispatchResult::Continue
            }
            Action::MenuDelete(slot) => {
                if self.stack.delete_at(slot).is_some() {
                    self.rebuild();
                }
                DispatchResult::Continue
            }
            Action::ClearAll => {
                self.request_clear();
                DispatchResult::Continue
            }
            Action::ClearConfirmation {
                confirmed,
                dont_ask_again,
            } => self.clear_answered(confirmed, dont_ask_again),
            Action::SettingsChanged(settings) => self.apply_settings(*settings),
            Action::Quit => {
                self.deferred_paste.cancel();
                DispatchResult::Quit
            }
        };

        self.report_persistence_failure();
        result
    }

    /* --------------------------- ingestion ---------------------------- */

    fn ingest(&mut self, text: &str) {
        if self
            .stack
            .item_at(0)
            .is_some_and(|head| head.full_text() == text)
        {
            trace!("Pasteboard text already at head");
            return;
        }

        if !self.stack.add(text) {
            return;
        }

        if self.settings.bezel_to_top {
            self.stack.set_position(0);
        } else {
            self.stack.set_position(self.stack.position() + 1);
        }
        debug!(len = self.stack.len(), position = self.stack.position(), "Ingested clipping");
        self.rebuild();
    }

    /* ----------------------------- overlay ---------------------------- */

    fn hotkey_pressed(&mut self) {
        if self.bezel_shown {
            self.stack.down();
        }
        self.display();
    }

    fn bezel_key(&mut self, key: BezelKey) {
        if !self.bezel_shown {
            trace!(?key, "Overlay key while hidden");
            return;
        }

        match key {
            BezelKey::Advance { shift: false } | BezelKey::Retreat { shift: true } => {
                self.stack.down();
            }
            BezelKey::Advance { shift: true } | BezelKey::Retreat { shift: false } => {
                self.stack.up();
            }
            BezelKey::PageDown => self.stack.move_by(PAGE_SIZE),
            BezelKey::PageUp => self.stack.move_by(-PAGE_SIZE),
            BezelKey::Home => self.stack.jump_to_start(),
            BezelKey::End => self.stack.jump_to_end(),
            BezelKey::Digit(_) => {
                if let Some(slot) = key.slot() {
                    self.stack.jump_to(slot);
                }
            }
            BezelKey::Delete => {
                if self.stack.delete().is_some() {
                    self.rebuild();
                }
                if self.stack.is_empty() {
                    self.dismiss();
                    return;
                }
            }
            BezelKey::Confirm => {
                self.confirm_selection();
                return;
            }
            BezelKey::Cancel => {
                self.dismiss();
                return;
            }
        }
        self.display();
    }

    fn confirm_selection(&mut self) {
        let Some(clip) = self.stack.current() else {
            trace!("Nothing to confirm");
            return;
        };
        let text = clip.full_text().to_owned();

        if self.settings.bezel_selection_pastes {
            self.paste(&text);
        } else {
            self.place(&text);
        }
    }

    fn display(&mut self) {
        self.bezel_shown = true;
        self.ui.display(self.stack.position(), self.stack.current());
    }

    fn dismiss(&mut self) {
        self.bezel_shown = false;
        self.ui.dismiss();
    }

    /* ------------------------ place and paste ------------------------- */

    /// Returns false when the pasteboard refused the write.
    fn place(&mut self, text: &str) -> bool {
        let placed = match self.pasteboard.write(text) {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "Unable to place clipping on pasteboard");
                self.ui.alert(Alert::PasteboardUnavailable {
                    reason: e.to_string(),
                });
                false
            }
        };
        self.dismiss();
        placed
    }

    fn paste(&mut self, text: &str) {
        if !self.place(text) {
            return;
        }
        let keystrokes = Arc::clone(&self.keystrokes);
        self.deferred_paste.schedule(move || keystrokes.emit_paste());
    }

    /* ------------------------------ menu ------------------------------ */

    fn menu_choose(&mut self, slot: usize, paste: bool, move_to_top: bool) {
        let Some(clip) = self.stack.item_at(slot) else {
            debug!(slot, "Menu slot resolves to no clipping");
            self.dismiss();
            return;
        };
        let text = clip.full_text().to_owned();

        if paste {
            self.paste(&text);
        } else {
            self.place(&text);
        }

        if move_to_top && self.stack.move_to_top(slot) {
            self.rebuild();
        }
    }

    fn rebuild(&mut self) {
        let menu = MenuSnapshot::from_clippings(self.stack.first_n(self.settings.display_num));
        self.ui.rebuild(&menu);
    }

    /* ---------------------------- clearing ---------------------------- */

    fn request_clear(&mut self) {
        if self.settings.ask_before_clearing {
            self.clear_pending = true;
            self.ui.request_clear_confirmation();
        } else {
            self.clear_all();
        }
    }

    fn clear_answered(&mut self, confirmed: bool, dont_ask_again: bool) -> DispatchResult {
        if !std::mem::take(&mut self.clear_pending) {
            debug!("Clear confirmation without a pending request");
            return DispatchResult::Continue;
        }

        if confirmed {
            self.clear_all();
        }

        if dont_ask_again && self.settings.ask_before_clearing {
            info!("Clear confirmation turned off");
            self.settings.ask_before_clearing = false;
            return DispatchResult::SettingsUpdated;
        }
        DispatchResult::Continue
    }

    fn clear_all(&mut self) {
        let Some(head) = self.stack.item_at(0) else {
            return;
        };

        // Leaving the former head on the pasteboard would bring it straight
        // back as a new clipping.
        if self.pasteboard.read_latest().as_deref() == Some(head.full_text()) {
            if let Err(e) = self.pasteboard.write_with("", true) {
                warn!(error = %e, "Unable to clear pasteboard");
            }
        }

        self.stack.clear();
        info!("Cleared all clippings");
        self.rebuild();
    }

    /* ---------------------------- settings ---------------------------- */

    fn apply_settings(&mut self, mut settings: Settings) -> DispatchResult {
        self.stack.set_capacity(settings.remember_num);
        self.stack.set_wraparound(settings.wraparound_bezel);
        self.deferred_paste.set_delay(settings.paste_delay);

        let store = self.stack.store_mut();
        store.set_accept_policy(settings.accept_policy());
        store.set_display_hint(settings.display_num);

        let enable = !settings.skip_save;
        if let Err(e) = store.set_persistence_enabled(enable) {
            warn!(error = %e, "Persistence toggle refused");
            settings.skip_save = !store.persistence_enabled();
            let alert = if e.is_persistence_error() {
                Alert::CannotSave {
                    reason: e.to_string(),
                }
            } else {
                Alert::ClearBeforeTogglingSave { enable }
            };
            self.ui.alert(alert);
        }

        self.settings = settings;
        debug!("Settings applied");
        self.rebuild();
        DispatchResult::SettingsUpdated
    }

    /* --------------------------- diagnostics -------------------------- */

    fn report_persistence_failure(&mut self) {
        match self.stack.store().last_persistence_error() {
            Some(err) if !self.save_failure_reported => {
                let reason = err.to_string();
                self.ui.alert(Alert::CannotSave { reason });
                self.save_failure_reported = true;
            }
            Some(_) => {}
            None => self.save_failure_reported = false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::platform::pasteboard::MemoryPasteboard;
    use clipstack::{Clipping, ClippingStore, StoreConfig};
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tempfile::TempDir;

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum UiEvent {
        Rebuild(Vec<String>),
        Display(usize, Option<String>),
        Dismiss,
        AskClear,
        Alert(Alert),
    }

    #[derive(Clone, Default)]
    struct RecordingUi(Arc<Mutex<Vec<UiEvent>>>);

    impl RecordingUi {
        fn take(&self) -> Vec<UiEvent> {
            std::mem::take(&mut *self.0.lock())
        }
    }

    impl UiSink for RecordingUi {
        fn rebuild(&mut self, menu: &MenuSnapshot) {
            let titles = menu.entries.iter().map(|e| e.title.clone()).collect();
            self.0.lock().push(UiEvent::Rebuild(titles));
        }

        fn display(&mut self, position: usize, clipping: Option<&Clipping>) {
            let text = clipping.map(|c| c.full_text().to_owned());
            self.0.lock().push(UiEvent::Display(position, text));
        }

        fn dismiss(&mut self) {
            self.0.lock().push(UiEvent::Dismiss);
        }

        fn request_clear_confirmation(&mut self) {
            self.0.lock().push(UiEvent::AskClear);
        }

        fn alert(&mut self, alert: Alert) {
            self.0.lock().push(UiEvent::Alert(alert));
        }
    }

    #[derive(Default)]
    struct CountingKeystrokes(AtomicUsize);

    /// Pasteboard whose writes always fail.
    struct LockedPasteboard;

    impl Pasteboard for LockedPasteboard {
        fn read_latest(&self) -> Option<String> {
            None
        }

        fn write_with(&self, _text: &str, _autogenerated: bool) -> Result<(), AppError> {
            Err(AppError::pasteboard("locked by another process"))
        }

        fn take_autogenerated(&self, _seen: &str) -> bool {
            false
        }
    }

    impl KeystrokeEmitter for CountingKeystrokes {
        fn emit_paste(&self) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    struct Harness {
        dispatcher: InteractionDispatcher,
        board: Arc<MemoryPasteboard>,
        keys: Arc<CountingKeystrokes>,
        ui: RecordingUi,
    }

    impl Harness {
        fn with_settings(settings: Settings, items: &[&str]) -> Self {
            let mut store = ClippingStore::in_memory(settings.remember_num);
            for text in items.iter().rev() {
                store.add(text);
            }
            Self::with_store(settings, store)
        }

        fn with_store(settings: Settings, store: ClippingStore) -> Self {
            let board = Arc::new(MemoryPasteboard::new());
            let keys = Arc::new(CountingKeystrokes::default());
            let ui = RecordingUi::default();
            let dispatcher = InteractionDispatcher::new(
                ClippingStack::new(store),
                settings,
                board.clone(),
                keys.clone(),
                Box::new(ui.clone()),
            );
            Self {
                dispatcher,
                board,
                keys,
                ui,
            }
        }

        fn new(items: &[&str]) -> Self {
            Self::with_settings(Settings::default(), items)
        }

        fn send(&mut self, action: Action) -> DispatchResult {
            self.dispatcher.handle(action)
        }

        fn key(&mut self, key: BezelKey) {
            self.send(Action::BezelKey(key));
        }

        fn texts(&self) -> Vec<&str> {
            self.dispatcher
                .stack()
                .store()
                .iter()
                .map(Clipping::full_text)
                .collect()
        }

        fn position(&self) -> usize {
            self.dispatcher.stack().position()
        }
    }

    async fn settle() {
        for _ in 0..4 {
            tokio::task::yield_now().await;
        }
    }

    #[test]
    fn test_ingest_inserts_at_head_and_rebuilds() {
        let mut h = Harness::new(&["b", "c"]);
        h.send(Action::PasteboardChanged("a".into()));

        assert_eq!(h.texts(), vec!["a", "b", "c"]);
        assert_eq!(h.position(), 0);
        assert_eq!(
            h.ui.take(),
            vec![UiEvent::Rebuild(vec!["a".into(), "b".into(), "c".into()])]
        );
    }

    #[test]
    fn test_ingest_same_as_head_is_idempotent() {
        let mut h = Harness::new(&[]);
        h.send(Action::PasteboardChanged("x".into()));
        h.send(Action::PasteboardChanged("x".into()));

        assert_eq!(h.texts(), vec!["x"]);
        assert_eq!(h.ui.take().len(), 1);
    }

    #[test]
    fn test_repeated_head_keeps_cursor() {
        let settings = Settings {
            bezel_to_top: false,
            ..Settings::default()
        };
        let mut h = Harness::with_settings(settings, &["a", "b", "c"]);
        h.send(Action::HotkeyPressed);
        h.key(BezelKey::Advance { shift: false });

        h.send(Action::PasteboardChanged("new".into()));
        assert_eq!(h.position(), 2);
        h.send(Action::PasteboardChanged("new".into()));

        assert_eq!(h.position(), 2);
        assert_eq!(h.texts(), vec!["new", "a", "b", "c"]);
    }

    #[test]
    fn test_ingest_rejected_text_changes_nothing() {
        let mut h = Harness::new(&["a"]);
        h.send(Action::PasteboardChanged("  \n ".into()));

        assert_eq!(h.texts(), vec!["a"]);
        assert!(h.ui.take().is_empty());
    }

    #[test]
    fn test_ingest_without_bezel_to_top_follows_selection() {
        let settings = Settings {
            bezel_to_top: false,
            ..Settings::default()
        };
        let mut h = Harness::with_settings(settings, &["a", "b", "c"]);
        h.send(Action::HotkeyPressed);
        h.key(BezelKey::Advance { shift: false });
        assert_eq!(h.position(), 1);

        h.send(Action::PasteboardChanged("new".into()));
        assert_eq!(h.position(), 2);
        assert_eq!(h.dispatcher.stack().current().map(Clipping::full_text), Some("b"));
    }

    #[test]
    fn test_ingest_without_bezel_to_top_stays_at_bottom() {
        let settings = Settings {
            bezel_to_top: false,
            ..Settings::default()
        };
        let mut h = Harness::with_settings(settings, &[]);
        h.send(Action::PasteboardChanged("first".into()));
        assert_eq!(h.position(), 0);
    }

    #[test]
    fn test_hotkey_shows_then_advances() {
        let mut h = Harness::new(&["a", "b"]);

        h.send(Action::HotkeyPressed);
        assert!(h.dispatcher.bezel_shown());
        h.send(Action::HotkeyPressed);
        h.send(Action::HotkeyPressed);

        assert_eq!(
            h.ui.take(),
            vec![
                UiEvent::Display(0, Some("a".into())),
                UiEvent::Display(1, Some("b".into())),
                UiEvent::Display(1, Some("b".into())),
            ]
        );
    }

    #[test]
    fn test_hotkey_on_empty_history_shows_empty_overlay() {
        let mut h = Harness::new(&[]);
        h.send(Action::HotkeyPressed);
        assert_eq!(h.ui.take(), vec![UiEvent::Display(0, None)]);
    }

    #[test]
    fn test_shift_reverses_direction_and_wraparound_applies() {
        let settings = Settings {
            wraparound_bezel: true,
            ..Settings::default()
        };
        let mut h = Harness::with_settings(settings, &["a", "b", "c"]);
        h.send(Action::HotkeyPressed);

        h.key(BezelKey::Advance { shift: true });
        assert_eq!(h.position(), 2);
        h.key(BezelKey::Retreat { shift: true });
        assert_eq!(h.position(), 0);
        h.key(BezelKey::Retreat { shift: false });
        assert_eq!(h.position(), 2);
    }

    #[test]
    fn test_paging_and_ends_clamp() {
        let items: Vec<String> = (0..25).map(|i| format!("clip {i}")).collect();
        let refs: Vec<&str> = items.iter().map(String::as_str).collect();
        let mut h = Harness::new(&refs);
        h.send(Action::HotkeyPressed);

        h.key(BezelKey::PageDown);
        assert_eq!(h.position(), 10);
        h.key(BezelKey::PageDown);
        h.key(BezelKey::PageDown);
        assert_eq!(h.position(), 24);
        h.key(BezelKey::PageUp);
        assert_eq!(h.position(), 14);
        h.key(BezelKey::Home);
        assert_eq!(h.position(), 0);
        h.key(BezelKey::PageUp);
        assert_eq!(h.position(), 0);
        h.key(BezelKey::End);
        assert_eq!(h.position(), 24);
    }

    #[test]
    fn test_digit_keys_select_slots() {
        let items: Vec<String> = (0..12).map(|i| i.to_string()).collect();
        let refs: Vec<&str> = items.iter().map(String::as_str).collect();
        let mut h = Harness::new(&refs);
        h.send(Action::HotkeyPressed);

        h.key(BezelKey::Digit(1));
        assert_eq!(h.position(), 0);
        h.key(BezelKey::Digit(5));
        assert_eq!(h.position(), 4);
        h.key(BezelKey::Digit(0));
        assert_eq!(h.position(), 9);

        let mut short = Harness::new(&["a", "b", "c"]);
        short.send(Action::HotkeyPressed);
        short.key(BezelKey::Digit(7));
        assert_eq!(short.position(), 2);
    }

    #[test]
    fn test_keys_ignored_while_hidden() {
        let mut h = Harness::new(&["a", "b"]);
        h.key(BezelKey::Advance { shift: false });

        assert_eq!(h.position(), 0);
        assert!(h.ui.take().is_empty());
    }

    #[test]
    fn test_bezel_delete_redisplays_then_dismisses_when_empty() {
        let mut h = Harness::new(&["a", "b"]);
        h.send(Action::HotkeyPressed);
        h.key(BezelKey::End);
        h.ui.take();

        h.key(BezelKey::Delete);
        assert_eq!(h.texts(), vec!["a"]);
        assert_eq!(
            h.ui.take(),
            vec![
                UiEvent::Rebuild(vec!["a".into()]),
                UiEvent::Display(0, Some("a".into())),
            ]
        );

        h.key(BezelKey::Delete);
        assert!(h.texts().is_empty());
        assert_eq!(h.ui.take(), vec![UiEvent::Rebuild(vec![]), UiEvent::Dismiss]);
        assert!(!h.dispatcher.bezel_shown());
    }

    #[test]
    fn test_confirm_places_without_paste() {
        let settings = Settings {
            bezel_selection_pastes: false,
            ..Settings::default()
        };
        let mut h = Harness::with_settings(settings, &["a", "b"]);
        h.send(Action::HotkeyPressed);
        h.key(BezelKey::Advance { shift: false });
        h.key(BezelKey::Confirm);

        assert_eq!(h.board.writes(), vec![("b".to_owned(), false)]);
        assert!(!h.dispatcher.bezel_shown());
        assert_eq!(h.ui.take().last(), Some(&UiEvent::Dismiss));
    }

    #[tokio::test(start_paused = true)]
    async fn test_confirm_pastes_after_delay() {
        let mut h = Harness::new(&["a"]);
        h.send(Action::HotkeyPressed);
        h.key(BezelKey::Confirm);

        assert_eq!(h.board.read_latest().as_deref(), Some("a"));
        settle().await;
        assert_eq!(h.keys.0.load(Ordering::SeqCst), 0);

        tokio::time::advance(Duration::from_millis(201)).await;
        settle().await;
        assert_eq!(h.keys.0.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_paste_cancels_pending_one() {
        let mut h = Harness::new(&["a", "b"]);
        h.send(Action::MenuPaste(0));
        settle().await;
        tokio::time::advance(Duration::from_millis(100)).await;
        h.send(Action::MenuPaste(1));
        settle().await;

        tokio::time::advance(Duration::from_millis(150)).await;
        settle().await;
        assert_eq!(h.keys.0.load(Ordering::SeqCst), 0);

        tokio::time::advance(Duration::from_millis(60)).await;
        settle().await;
        assert_eq!(h.keys.0.load(Ordering::SeqCst), 1);
        assert_eq!(h.board.read_latest().as_deref(), Some("b"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_place_skips_paste() {
        let keys = Arc::new(CountingKeystrokes::default());
        let ui = RecordingUi::default();
        let mut store = ClippingStore::in_memory(10);
        store.add("a");
        let mut dispatcher = InteractionDispatcher::new(
            ClippingStack::new(store),
            Settings::default(),
            Arc::new(LockedPasteboard),
            keys.clone(),
            Box::new(ui.clone()),
        );

        dispatcher.handle(Action::MenuPaste(0));
        settle().await;
        tokio::time::advance(Duration::from_millis(500)).await;
        settle().await;

        assert_eq!(keys.0.load(Ordering::SeqCst), 0);
        assert!(
            ui.take()
                .iter()
                .any(|e| matches!(e, UiEvent::Alert(Alert::PasteboardUnavailable { .. })))
        );
    }

    #[test]
    fn test_confirm_on_empty_history_is_noop() {
        let mut h = Harness::new(&[]);
        h.send(Action::HotkeyPressed);
        h.key(BezelKey::Confirm);

        assert!(h.board.writes().is_empty());
        assert!(h.dispatcher.bezel_shown());
    }

    #[test]
    fn test_modifier_release_confirms_unless_sticky() {
        let settings = Settings {
            bezel_selection_pastes: false,
            ..Settings::default()
        };
        let mut h = Harness::with_settings(settings.clone(), &["a"]);
        h.send(Action::HotkeyPressed);
        h.send(Action::ModifiersReleased);
        assert_eq!(h.board.writes().len(), 1);
        assert!(!h.dispatcher.bezel_shown());

        let sticky = Settings {
            sticky_bezel: true,
            ..settings
        };
        let mut h = Harness::with_settings(sticky, &["a"]);
        h.send(Action::HotkeyPressed);
        h.send(Action::ModifiersReleased);
        assert!(h.board.writes().is_empty());
        assert!(h.dispatcher.bezel_shown());
    }

    #[test]
    fn test_modifier_release_while_hidden_does_nothing() {
        let mut h = Harness::new(&["a"]);
        h.send(Action::ModifiersReleased);
        assert!(h.board.writes().is_empty());
    }

    #[tokio::test]
    async fn test_menu_select_alternate_inverts_paste() {
        let settings = Settings {
            menu_selection_pastes: false,
            ..Settings::default()
        };
        let mut h = Harness::with_settings(settings, &["a", "b"]);

        h.send(Action::MenuSelect {
            slot: 1,
            alternate: false,
        });
        assert!(!h.dispatcher.deferred_paste.is_pending());

        h.send(Action::MenuSelect {
            slot: 0,
            alternate: true,
        });
        assert!(h.dispatcher.deferred_paste.is_pending());
        assert_eq!(
            h.board.writes(),
            vec![("b".to_owned(), false), ("a".to_owned(), false)]
        );
    }

    #[test]
    fn test_menu_place_on_missing_slot_dismisses() {
        let mut h = Harness::new(&["a"]);
        h.send(Action::MenuPlace(5));

        assert!(h.board.writes().is_empty());
        assert_eq!(h.ui.take(), vec![UiEvent::Dismiss]);
    }

    #[test]
    fn test_menu_selection_moves_to_top() {
        let settings = Settings {
            menu_selection_pastes: false,
            menu_selection_moves_to_top: true,
            ..Settings::default()
        };
        let mut h = Harness::with_settings(settings, &["a", "b", "c"]);
        h.send(Action::MenuSelect {
            slot: 2,
            alternate: false,
        });

        assert_eq!(h.texts(), vec!["c", "a", "b"]);
        assert_eq!(h.board.read_latest().as_deref(), Some("c"));

        // Explicit place never reorders.
        h.send(Action::MenuPlace(2));
        assert_eq!(h.texts(), vec!["c", "a", "b"]);
    }

    #[test]
    fn test_menu_delete_reindexes_cursor() {
        let mut h = Harness::new(&["a", "b", "c"]);
        h.send(Action::HotkeyPressed);
        h.key(BezelKey::End);

        h.send(Action::MenuDelete(0));
        assert_eq!(h.texts(), vec!["b", "c"]);
        assert_eq!(h.position(), 1);

        h.ui.take();
        h.send(Action::MenuDelete(7));
        assert!(h.ui.take().is_empty());
    }

    #[test]
    fn test_clear_asks_first_and_clears_pasteboard_holding_head() {
        let mut h = Harness::new(&["a", "b"]);
        h.board.copy_external("a");

        h.send(Action::ClearAll);
        assert_eq!(h.ui.take(), vec![UiEvent::AskClear]);
        assert_eq!(h.texts().len(), 2);

        let result = h.send(Action::ClearConfirmation {
            confirmed: true,
            dont_ask_again: false,
        });
        assert_eq!(result, DispatchResult::Continue);
        assert!(h.texts().is_empty());
        assert_eq!(h.board.writes(), vec![(String::new(), true)]);
        assert_eq!(h.ui.take(), vec![UiEvent::Rebuild(vec![])]);
    }

    #[test]
    fn test_clear_leaves_unrelated_pasteboard_alone() {
        let settings = Settings {
            ask_before_clearing: false,
            ..Settings::default()
        };
        let mut h = Harness::with_settings(settings, &["a", "b"]);
        h.board.copy_external("something else");

        h.send(Action::ClearAll);
        assert!(h.texts().is_empty());
        assert!(h.board.writes().is_empty());
    }

    #[test]
    fn test_clear_cancelled_keeps_history_and_can_stop_asking() {
        let mut h = Harness::new(&["a"]);
        h.send(Action::ClearAll);

        let result = h.send(Action::ClearConfirmation {
            confirmed: false,
            dont_ask_again: true,
        });
        assert_eq!(result, DispatchResult::SettingsUpdated);
        assert_eq!(h.texts(), vec!["a"]);
        assert!(!h.dispatcher.settings().ask_before_clearing);

        h.send(Action::ClearAll);
        assert!(h.texts().is_empty());
    }

    #[test]
    fn test_unsolicited_confirmation_is_ignored() {
        let mut h = Harness::new(&["a"]);
        let result = h.send(Action::ClearConfirmation {
            confirmed: true,
            dont_ask_again: true,
        });

        assert_eq!(result, DispatchResult::Continue);
        assert_eq!(h.texts(), vec!["a"]);
    }

    #[test]
    fn test_clear_on_empty_history_does_nothing() {
        let settings = Settings {
            ask_before_clearing: false,
            ..Settings::default()
        };
        let mut h = Harness::with_settings(settings, &[]);
        h.board.copy_external("");

        h.send(Action::ClearAll);
        assert!(h.board.writes().is_empty());
        assert!(h.ui.take().is_empty());
    }

    #[test]
    fn test_settings_hook_reclamps_capacity_and_cursor() {
        let items: Vec<String> = (0..30).map(|i| i.to_string()).collect();
        let refs: Vec<&str> = items.iter().map(String::as_str).collect();
        let mut h = Harness::new(&refs);
        h.send(Action::HotkeyPressed);
        h.key(BezelKey::End);

        let result = h.send(Action::SettingsChanged(Box::new(Settings {
            remember_num: 3,
            display_num: 5,
            wraparound_bezel: true,
            skip_save: true,
            ..Settings::default()
        })));

        assert_eq!(result, DispatchResult::SettingsUpdated);
        assert_eq!(h.dispatcher.stack().len(), 10);
        assert_eq!(h.position(), 9);
        assert!(h.dispatcher.stack().wraparound());

        let rebuilds: Vec<UiEvent> = h
            .ui
            .take()
            .into_iter()
            .filter(|e| matches!(e, UiEvent::Rebuild(_)))
            .collect();
        assert_eq!(
            rebuilds,
            vec![UiEvent::Rebuild(
                ["0", "1", "2", "3", "4"].map(String::from).to_vec()
            )]
        );
    }

    #[test]
    fn test_settings_hook_refuses_persistence_toggle_with_history() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("JCEngine.save");
        let store = ClippingStore::open(StoreConfig::default().with_store_file(&path)).unwrap();
        let mut h = Harness::with_store(Settings::default(), store);
        h.send(Action::PasteboardChanged("keep me".into()));
        h.ui.take();

        h.send(Action::SettingsChanged(Box::new(Settings {
            skip_save: true,
            ..Settings::default()
        })));

        assert!(h.dispatcher.stack().store().persistence_enabled());
        assert!(!h.dispatcher.settings().skip_save);
        assert!(
            h.ui
                .take()
                .contains(&UiEvent::Alert(Alert::ClearBeforeTogglingSave { enable: false }))
        );
    }

    #[test]
    fn test_write_failure_alerts_once() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("JCEngine.save");
        std::fs::create_dir_all(path.with_extension("tmp")).unwrap();
        let store = ClippingStore::open(StoreConfig::default().with_store_file(&path)).unwrap();
        let mut h = Harness::with_store(Settings::default(), store);

        h.send(Action::PasteboardChanged("one".into()));
        h.send(Action::PasteboardChanged("two".into()));

        let alerts: Vec<UiEvent> = h
            .ui
            .take()
            .into_iter()
            .filter(|e| matches!(e, UiEvent::Alert(_)))
            .collect();
        assert_eq!(alerts.len(), 1);
        assert!(matches!(alerts[0], UiEvent::Alert(Alert::CannotSave { .. })));
        assert_eq!(h.texts(), vec!["two", "one"]);
    }

    #[test]
    fn test_start_reports_unreadable_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("JCEngine.save");
        std::fs::write(&path, "{ not json").unwrap();
        let store = ClippingStore::open(StoreConfig::default().with_store_file(&path)).unwrap();
        let mut h = Harness::with_store(Settings::default(), store);

        h.dispatcher.start();
        let events = h.ui.take();
        assert!(matches!(events[0], UiEvent::Alert(Alert::CannotLoad { .. })));
        assert_eq!(events[1], UiEvent::Rebuild(vec![]));
    }

    #[test]
    fn test_save_failure_after_load_failure_still_alerts() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("JCEngine.save");
        std::fs::write(&path, "{ not json").unwrap();
        std::fs::create_dir_all(path.with_extension("tmp")).unwrap();
        let store = ClippingStore::open(StoreConfig::default().with_store_file(&path)).unwrap();
        let mut h = Harness::with_store(Settings::default(), store);

        h.dispatcher.start();
        h.send(Action::PasteboardChanged("one".into()));

        let alerts: Vec<UiEvent> = h
            .ui
            .take()
            .into_iter()
            .filter(|e| matches!(e, UiEvent::Alert(_)))
            .collect();
        assert_eq!(alerts.len(), 2);
        assert!(matches!(alerts[0], UiEvent::Alert(Alert::CannotLoad { .. })));
        assert!(matches!(alerts[1], UiEvent::Alert(Alert::CannotSave { .. })));
    }

    #[test]
    fn test_quit() {
        let mut h = Harness::new(&[]);
        assert_eq!(h.send(Action::Quit), DispatchResult::Quit);
    }
}
