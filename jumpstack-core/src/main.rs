//! src/main.rs
//! jumpstack: pasteboard history daemon

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::{signal, sync::mpsc};
use tracing::{info, warn};

use clipstack::{ClippingStack, ClippingStore};
use jumpstack_core::{
    LoggerBuilder, Settings,
    controller::{Action, EventLoop, InteractionDispatcher},
    platform::{PasteboardWatcher, SystemPasteboard},
    view::{LoggingKeystrokes, TracingUi, console::spawn_console},
};

#[tokio::main(flavor = "multi_thread", worker_threads = 2)]
async fn main() -> Result<()> {
    let settings = Settings::load()
        .await
        .context("Failed to load settings")?;

    let log_dir = Settings::data_dir()
        .context("Failed to resolve data directory")?
        .join("logs");
    let _log_guard = LoggerBuilder::new()
        .with_config(settings.logging.clone())
        .with_fallback_dir(log_dir)
        .build()
        .context("Failed to initialize logging")?;
    info!(version = env!("CARGO_PKG_VERSION"), "Starting jumpstack");

    let store_config = settings
        .store_config()
        .context("Failed to resolve clippings file")?;
    let store = ClippingStore::open(store_config).context("Failed to open clipping store")?;
    info!(
        clippings = store.len(),
        persist = store.persistence_enabled(),
        path = ?store.store_path(),
        "Clipping store ready"
    );

    let pasteboard = Arc::new(SystemPasteboard::new().context("Failed to open the pasteboard")?);
    let (action_tx, action_rx) = mpsc::unbounded_channel::<Action>();

    let watcher = PasteboardWatcher::new(
        pasteboard.clone(),
        action_tx.clone(),
        settings.poll_interval,
    )
    .start();
    let console = spawn_console(action_tx.clone());
    setup_shutdown_handler(action_tx);

    let settings_path = Settings::config_path().context("Failed to resolve settings path")?;
    let dispatcher = InteractionDispatcher::new(
        ClippingStack::new(store),
        settings,
        pasteboard,
        Arc::new(LoggingKeystrokes),
        Box::new(TracingUi::new()),
    );

    let (dispatcher, _) = EventLoop::new(dispatcher, action_rx, settings_path)
        .run()
        .await;

    watcher.abort();
    console.abort();

    if let Some(e) = dispatcher.stack().store().last_persistence_error() {
        warn!(error = %e, "Exiting with unsaved clippings");
    }
    info!("jumpstack exited cleanly");
    Ok(())
}

fn setup_shutdown_handler(action_tx: mpsc::UnboundedSender<Action>) {
    tokio::spawn(async move {
        #[cfg(unix)]
        {
            use tokio::signal::unix::{SignalKind, signal};

            let mut sigterm = match signal(SignalKind::terminate()) {
                Ok(sigterm) => sigterm,
                Err(e) => {
                    warn!("Failed to create SIGTERM handler: {}", e);
                    return;
                }
            };

            tokio::select! {
                _ = sigterm.recv() => info!("Received SIGTERM"),
                _ = signal::ctrl_c() => info!("Received Ctrl+C"),
            }
        }

        #[cfg(not(unix))]
        {
            if let Err(e) = signal::ctrl_c().await {
                warn!("Failed to listen for Ctrl+C: {}", e);
                return;
            }
            info!("Received Ctrl+C");
        }

        let _ = action_tx.send(Action::Quit);
    });
}
