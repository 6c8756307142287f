//! src/logging.rs
//! ============================================================================
//! # Logging: tracing subscriber setup
//!
//! JSON lines go to a rolling file through a non-blocking writer; a plain
//! human-readable layer can be mirrored to stderr. Both share the same
//! `EnvFilter`, seeded from `RUST_LOG` and the configured level.

use std::{
    path::{Path, PathBuf},
    str::FromStr,
};

use anyhow::{Context, Result};
use compact_str::CompactString;
use serde::{Deserialize, Serialize};
use tracing_appender::{
    non_blocking::WorkerGuard,
    rolling::{RollingFileAppender, Rotation},
};
use tracing_subscriber::{
    EnvFilter, Layer, filter::Directive, layer::SubscriberExt, util::SubscriberInitExt,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    /// Directory for log files; `None` uses the platform data directory
    pub log_dir: Option<PathBuf>,
    pub log_file_prefix: CompactString,
    pub log_level: CompactString,
    pub max_log_files: usize,
    pub rotation: LogRotation,
    /// Mirror log lines to stderr
    pub stderr: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogRotation {
    Never,
    Daily,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            log_dir: None,
            log_file_prefix: CompactString::const_new("jumpstack"),
            log_level: CompactString::const_new("info"),
            max_log_files: 10,
            rotation: LogRotation::Daily,
            stderr: true,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("Invalid log directory: {0}")]
    InvalidLogDirectory(String),

    #[error("Failed to create log directory: {0}")]
    DirectoryCreationFailed(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

pub struct LoggerBuilder {
    config: LoggerConfig,
    fallback_dir: PathBuf,
}

impl LoggerBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: LoggerConfig::default(),
            fallback_dir: PathBuf::from("./logs"),
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: LoggerConfig) -> Self {
        self.config = config;
        self
    }

    /// Directory used when the config does not name one.
    #[must_use]
    pub fn with_fallback_dir<P: AsRef<Path>>(mut self, dir: P) -> Self {
        self.fallback_dir = dir.as_ref().to_path_buf();
        self
    }

    pub fn log_dir(&self) -> &Path {
        self.config.log_dir.as_deref().unwrap_or(&self.fallback_dir)
    }

    /// Install the global subscriber. Keep the returned guard alive for as
    /// long as logs should be flushed to the file.
    pub fn build(self) -> Result<WorkerGuard> {
        validate_config(&self.config)?;
        let log_dir = self.log_dir().to_path_buf();
        validate_log_directory(&log_dir)?;
        setup_log_directory(&log_dir)?;

        let rotation = match self.config.rotation {
            LogRotation::Never => Rotation::NEVER,
            LogRotation::Daily => Rotation::DAILY,
        };

        let file_appender = RollingFileAppender::builder()
            .rotation(rotation)
            .filename_prefix(self.config.log_file_prefix.as_str())
            .filename_suffix("jsonl")
            .max_log_files(self.config.max_log_files)
            .build(&log_dir)
            .context("Failed to create file appender")?;
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        let level = self.config.log_level.clone();
        let make_filter = || -> Result<EnvFilter> {
            Ok(EnvFilter::from_default_env()
                .add_directive(Directive::from_str(&level).context("Invalid log level in config")?))
        };

        let json_layer = tracing_subscriber::fmt::layer()
            .json()
            .with_current_span(true)
            .with_writer(non_blocking)
            .with_filter(make_filter()?);

        let stderr_layer = self.config.stderr.then(|| {
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr)
        });

        tracing_subscriber::registry()
            .with(json_layer)
            .with(stderr_layer.with_filter(make_filter()?))
            .try_init()
            .context("Failed to install global tracing subscriber")?;

        Ok(guard)
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn validate_config(config: &LoggerConfig) -> Result<()> {
    if config.log_file_prefix.is_empty() {
        return Err(LoggingError::ConfigError("Log file prefix must not be empty".to_string()).into());
    }

    if config.max_log_files == 0 {
        return Err(
            LoggingError::ConfigError("Max log files must be greater than 0".to_string()).into(),
        );
    }

    Directive::from_str(&config.log_level)
        .map_err(|e| LoggingError::ConfigError(format!("Invalid log level: {e}")))?;
    Ok(())
}

fn validate_log_directory(path: &Path) -> Result<()> {
    if path.components().count() == 0 {
        return Err(LoggingError::InvalidLogDirectory("Empty path".to_string()).into());
    }

    for component in path.components() {
        if component == std::path::Component::ParentDir {
            return Err(LoggingError::InvalidLogDirectory(
                "Path contains parent directory references".to_string(),
            )
            .into());
        }
    }

    Ok(())
}

fn setup_log_directory(log_dir: &Path) -> Result<()> {
    if !log_dir.exists() {
        std::fs::create_dir_all(log_dir)
            .map_err(LoggingError::from)
            .with_context(|| format!("Failed to create log directory: {}", log_dir.display()))?;
    }
    Ok(())
}
