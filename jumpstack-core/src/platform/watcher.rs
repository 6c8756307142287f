//! Pasteboard watcher: polls the pasteboard and reports new text to the
//! control loop.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, info, trace};

use crate::controller::actions::Action;
use crate::controller::traits::Pasteboard;
use crate::error::AppError;

/// `tokio::time::interval` rejects a zero period.
const MIN_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Polling task runner.
pub struct PasteboardWatcher {
    pasteboard: Arc<dyn Pasteboard>,
    action_tx: UnboundedSender<Action>,
    poll_interval: Duration,
    last_seen: Option<String>,
    seeded: bool,
}

impl PasteboardWatcher {
    pub fn new(
        pasteboard: Arc<dyn Pasteboard>,
        action_tx: UnboundedSender<Action>,
        poll_interval: Duration,
    ) -> Self {
        Self {
            pasteboard,
            action_tx,
            poll_interval: poll_interval.max(MIN_POLL_INTERVAL),
            last_seen: None,
            seeded: false,
        }
    }

    /// Check the pasteboard once.
    ///
    /// The first poll only records what is already there, so the text
    /// present at start-up is not taken as a fresh copy. Text the engine
    /// wrote with `autogenerated` set is skipped.
    pub fn poll_once(&mut self) -> Result<(), AppError> {
        let Some(text) = self.pasteboard.read_latest() else {
            // An emptied pasteboard makes the next copy new, even if it
            // repeats the text seen before.
            self.last_seen = None;
            self.seeded = true;
            return Ok(());
        };

        if self.last_seen.as_deref() == Some(text.as_str()) {
            return Ok(());
        }
        self.last_seen = Some(text.clone());

        if !self.seeded {
            self.seeded = true;
            trace!(len = text.len(), "Seeded pasteboard watcher");
            return Ok(());
        }

        if self.pasteboard.take_autogenerated(&text) {
            debug!("Skipping autogenerated pasteboard write");
            return Ok(());
        }

        self.action_tx
            .send(Action::PasteboardChanged(text))
            .map_err(|_| AppError::ChannelClosed)
    }

    /// Start polling on the current runtime. The task ends when the action
    /// channel closes.
    pub fn start(mut self) -> JoinHandle<()> {
        tokio::spawn(async move {
            info!(interval = ?self.poll_interval, "Pasteboard watcher started");
            let mut ticker = interval(self.poll_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                ticker.tick().await;
                if self.poll_once().is_err() {
                    break; // Stop if channel is closed
                }
            }
            info!("Pasteboard watcher stopped");
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::pasteboard::MemoryPasteboard;
    use tokio::sync::mpsc;

    fn watcher() -> (
        Arc<MemoryPasteboard>,
        PasteboardWatcher,
        mpsc::UnboundedReceiver<Action>,
    ) {
        let board = Arc::new(MemoryPasteboard::new());
        let (tx, rx) = mpsc::unbounded_channel();
        let watcher = PasteboardWatcher::new(board.clone(), tx, Duration::from_millis(500));
        (board, watcher, rx)
    }

    fn changed(rx: &mut mpsc::UnboundedReceiver<Action>) -> Vec<String> {
        let mut seen = Vec::new();
        while let Ok(action) = rx.try_recv() {
            if let Action::PasteboardChanged(text) = action {
                seen.push(text);
            }
        }
        seen
    }

    #[test]
    fn test_startup_contents_are_not_ingested() {
        let (board, mut watcher, mut rx) = watcher();
        board.copy_external("already there");

        watcher.poll_once().unwrap();
        watcher.poll_once().unwrap();
        assert!(changed(&mut rx).is_empty());

        board.copy_external("new");
        watcher.poll_once().unwrap();
        assert_eq!(changed(&mut rx), vec!["new".to_owned()]);
    }

    #[test]
    fn test_empty_pasteboard_seeds_watcher() {
        let (board, mut watcher, mut rx) = watcher();

        watcher.poll_once().unwrap();
        board.copy_external("first copy");
        watcher.poll_once().unwrap();

        assert_eq!(changed(&mut rx), vec!["first copy".to_owned()]);
    }

    #[test]
    fn test_autogenerated_writes_are_skipped() {
        let (board, mut watcher, mut rx) = watcher();
        watcher.poll_once().unwrap();

        board.write_with("", true).unwrap();
        watcher.poll_once().unwrap();
        board.write("placed").unwrap();
        watcher.poll_once().unwrap();

        assert_eq!(changed(&mut rx), vec!["placed".to_owned()]);
    }

    #[test]
    fn test_recopy_after_clear_is_ingested() {
        let (board, mut watcher, mut rx) = watcher();
        watcher.poll_once().unwrap();

        board.copy_external("a");
        watcher.poll_once().unwrap();
        board.write_with("", true).unwrap();
        watcher.poll_once().unwrap();
        board.copy_external("a");
        watcher.poll_once().unwrap();

        assert_eq!(changed(&mut rx), vec!["a".to_owned(), "a".to_owned()]);
    }

    #[test]
    fn test_closed_channel_is_reported() {
        let (board, mut watcher, rx) = watcher();
        watcher.poll_once().unwrap();
        drop(rx);

        board.copy_external("orphan");
        assert!(matches!(watcher.poll_once(), Err(AppError::ChannelClosed)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_task_polls_on_interval() {
        let (board, watcher, mut rx) = watcher();
        let handle = watcher.start();

        tokio::time::sleep(Duration::from_millis(10)).await;
        board.copy_external("tick");
        tokio::time::sleep(Duration::from_millis(600)).await;

        match rx.recv().await {
            Some(Action::PasteboardChanged(text)) => assert_eq!(text, "tick"),
            other => panic!("unexpected action: {other:?}"),
        }
        handle.abort();
    }
}
