//! src/config.rs
//! ============================================================================
//! # Settings: user preferences, loaded and saved as TOML
//!
//! Lives at `<config_dir>/config.toml` as resolved by
//! [`directories::ProjectDirs`]. A missing file is created with defaults; a
//! missing key falls back to its default, so older files keep loading.
//!
//! The dispatcher receives a `Settings` value at construction and later
//! copies through `Action::SettingsChanged`; nothing reads settings globally.
//!
//! ```rust,ignore
//! let settings = Settings::load().await?;
//! let store = ClippingStore::open(settings.store_config()?)?;
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use clipstack::{AcceptPolicy, StoreConfig, persistence::STORE_FILE_NAME};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tokio::fs as TokioFs;
use tracing::info;

use crate::error::AppError;
use crate::logging::LoggerConfig;

const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Number of clippings remembered
    pub remember_num: usize,

    /// Number of clippings shown in the menu
    pub display_num: usize,

    /// Overlay navigation wraps past either end
    pub wraparound_bezel: bool,

    /// A new clipping moves the cursor back to the newest entry
    pub bezel_to_top: bool,

    /// Confirming in the overlay pastes instead of only placing
    pub bezel_selection_pastes: bool,

    /// Choosing from the menu pastes instead of only placing
    pub menu_selection_pastes: bool,

    pub menu_selection_moves_to_top: bool,

    pub ask_before_clearing: bool,

    /// Overlay stays open when the hotkey modifiers are released
    pub sticky_bezel: bool,

    pub ignore_blank: bool,

    pub ignore_large_clippings: bool,

    /// Keep the history in memory only
    pub skip_save: bool,

    /// Wait between placing a clipping and emitting the paste keystroke
    #[serde(with = "humantime_serde")]
    pub paste_delay: Duration,

    /// How often the pasteboard watcher polls
    #[serde(with = "humantime_serde")]
    pub poll_interval: Duration,

    /// Override for the clippings file location
    pub store_path: Option<PathBuf>,

    pub logging: LoggerConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            remember_num: clipstack::config::DEFAULT_CAPACITY,
            display_num: clipstack::config::DEFAULT_DISPLAY_NUM,
            wraparound_bezel: false,
            bezel_to_top: true,
            bezel_selection_pastes: true,
            menu_selection_pastes: true,
            menu_selection_moves_to_top: false,
            ask_before_clearing: true,
            sticky_bezel: false,
            ignore_blank: true,
            ignore_large_clippings: true,
            skip_save: false,
            paste_delay: Duration::from_millis(200),
            poll_interval: Duration::from_millis(500),
            store_path: None,
            logging: LoggerConfig::default(),
        }
    }
}

impl Settings {
    /// Loads settings from the platform config dir, creating the file with
    /// defaults when it does not exist yet.
    pub async fn load() -> Result<Self, AppError> {
        Self::load_from(&Self::config_path()?).await
    }

    pub async fn load_from(path: &Path) -> Result<Self, AppError> {
        match TokioFs::read_to_string(path).await {
            Ok(text) => {
                info!("Loading settings from {}", path.display());
                Ok(toml::from_str(&text)?)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!(
                    "No settings file at {}, writing defaults",
                    path.display()
                );
                let settings = Self::default();
                settings.save_to(path).await?;
                Ok(settings)
            }
            Err(e) => Err(AppError::config_io(path, e)),
        }
    }

    pub async fn save_to(&self, path: &Path) -> Result<(), AppError> {
        info!("Saving settings to {}", path.display());

        if let Some(parent) = path.parent() {
            TokioFs::create_dir_all(parent)
                .await
                .map_err(|e| AppError::config_io(parent, e))?;
        }

        let text = toml::to_string_pretty(self)?;
        TokioFs::write(path, text)
            .await
            .map_err(|e| AppError::config_io(path, e))
    }

    fn project_dirs() -> Result<ProjectDirs, AppError> {
        ProjectDirs::from("org", "jumpstack", "jumpstack").ok_or(AppError::NoProjectDirs("home"))
    }

    pub fn config_path() -> Result<PathBuf, AppError> {
        Ok(Self::project_dirs()?.config_dir().join(CONFIG_FILE_NAME))
    }

    pub fn data_dir() -> Result<PathBuf, AppError> {
        Ok(Self::project_dirs()?.data_dir().to_path_buf())
    }

    /// Clippings file: the override when set, else `<data_dir>/JCEngine.save`.
    pub fn resolved_store_path(&self) -> Result<PathBuf, AppError> {
        match &self.store_path {
            Some(path) => Ok(path.clone()),
            None => Ok(Self::data_dir()?.join(STORE_FILE_NAME)),
        }
    }

    pub fn accept_policy(&self) -> AcceptPolicy {
        AcceptPolicy {
            ignore_blank: self.ignore_blank,
            ignore_large: self.ignore_large_clippings,
        }
    }

    /// Store configuration for these settings. The file location is always
    /// resolved so persistence can be switched on later.
    pub fn store_config(&self) -> Result<StoreConfig, AppError> {
        Ok(StoreConfig {
            capacity: self.remember_num,
            display_num: self.display_num,
            persist: !self.skip_save,
            store_file: Some(self.resolved_store_path()?),
            accept: self.accept_policy(),
        })
    }
}
