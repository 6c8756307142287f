pub mod error;

pub mod config;

pub mod controller {
    pub mod actions;
    pub use actions::{Action, BezelKey, DispatchResult};

    pub mod interactions;
    pub use interactions::InteractionDispatcher;

    pub mod event_loop;
    pub use event_loop::{EventLoop, LoopStats};

    pub mod traits;
    pub use traits::{KeystrokeEmitter, Pasteboard, UiSink};
}

pub mod platform {
    pub mod pasteboard;
    pub use pasteboard::{MemoryPasteboard, SystemPasteboard};

    pub mod watcher;
    pub use watcher::PasteboardWatcher;
}

pub mod view {
    pub mod console;

    pub mod tracing_ui;
    pub use tracing_ui::{LoggingKeystrokes, TracingUi};
}

pub mod logging;
pub use logging::LoggerBuilder;

pub mod util {
    pub mod deferred;
}

pub use config::Settings;
pub use error::AppError;
