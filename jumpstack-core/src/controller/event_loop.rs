//! src/controller/event_loop.rs
//! ============================================================================
//! # Control loop
//!
//! The single consumer of the action channel. Actions are applied one at a
//! time, so every stack mutation and every clippings-file write happens on
//! this task, in order.

use std::path::PathBuf;
use std::time::Instant;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::controller::actions::{Action, DispatchResult};
use crate::controller::interactions::InteractionDispatcher;

/// Counters reported when the loop ends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoopStats {
    pub actions: u64,
    pub settings_saves: u64,
}

pub struct EventLoop {
    dispatcher: InteractionDispatcher,
    action_rx: mpsc::UnboundedReceiver<Action>,
    settings_path: PathBuf,
    stats: LoopStats,
}

impl EventLoop {
    pub fn new(
        dispatcher: InteractionDispatcher,
        action_rx: mpsc::UnboundedReceiver<Action>,
        settings_path: PathBuf,
    ) -> Self {
        info!("Initializing control loop");
        Self {
            dispatcher,
            action_rx,
            settings_path,
            stats: LoopStats::default(),
        }
    }

    /// Run until `Action::Quit` arrives or every sender is gone. Returns the
    /// dispatcher so callers can inspect the final state.
    pub async fn run(mut self) -> (InteractionDispatcher, LoopStats) {
        self.dispatcher.start();
        let started = Instant::now();

        while let Some(action) = self.action_rx.recv().await {
            self.stats.actions += 1;
            match self.dispatcher.handle(action) {
                DispatchResult::Continue => {}
                DispatchResult::SettingsUpdated => self.save_settings().await,
                DispatchResult::Quit => {
                    info!("Quit action received");
                    break;
                }
            }
        }

        info!(
            actions = self.stats.actions,
            settings_saves = self.stats.settings_saves,
            uptime = ?started.elapsed(),
            "Control loop terminated"
        );
        (self.dispatcher, self.stats)
    }

    async fn save_settings(&mut self) {
        match self.dispatcher.settings().save_to(&self.settings_path).await {
            Ok(()) => {
                self.stats.settings_saves += 1;
                debug!("Settings saved after update");
            }
            Err(e) => warn!(error = %e, "Unable to save settings"),
        }
    }
}
