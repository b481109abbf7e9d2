//! # Logger
//!
//! Installs the process-wide `tracing` subscriber for a sluice worker.
//!
//! Output goes to stdout, to a rolling file, or both; either sink can emit
//! compact text or one JSON object per line. The maximum level and extra
//! filter directives come from the builder or from a [`LogConfig`] loaded with
//! the rest of the worker's configuration. `RUST_LOG` is honoured when no
//! explicit directives are given.
//!
//! ## Example
//!
//! ```rust
//! use sluice_logger::{LevelFilter, Logger};
//!
//! let _logger = Logger::builder()
//!     .name("orders-worker")
//!     .level(LevelFilter::DEBUG)
//!     .env_filter("sluice_events=trace")
//!     .init()
//!     .unwrap();
//! ```

mod config;
mod error;

pub use crate::config::{LogConfig, Rolling};
pub use crate::error::{LoggerError, LoggerErrorExt};
pub use tracing::level_filters::LevelFilter;

use crate::config::DEFAULT_MAX_FILES;
use std::fs;
use std::path::PathBuf;
use std::str::FromStr;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::RollingFileAppender;
use tracing_subscriber::fmt::layer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

const LOG_FILE_SUFFIX: &str = "log";

/// Collects logger settings; [`LoggerBuilder::init`] installs them globally.
#[derive(Debug)]
#[must_use = "builders do nothing unless you call .init()"]
pub struct LoggerBuilder {
    name: Option<String>,
    level: LevelFilter,
    filter: Option<String>,
    console: bool,
    json: bool,
    path: Option<PathBuf>,
    rolling: Rolling,
    max_files: usize,
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self {
            name: None,
            level: LevelFilter::INFO,
            filter: None,
            console: true,
            json: false,
            path: None,
            rolling: Rolling::default(),
            max_files: DEFAULT_MAX_FILES,
        }
    }
}

impl LoggerBuilder {
    /// Identifies the process in file names (`<name>.<date>.log`). Required.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub const fn level(mut self, level: LevelFilter) -> Self {
        self.level = level;
        self
    }

    /// Adds filter directives on top of the default level, e.g.
    /// `sluice_events=trace,sluice_codec=warn`. Replaces `RUST_LOG`.
    pub fn env_filter(mut self, directives: impl Into<String>) -> Self {
        self.filter = Some(directives.into());
        self
    }

    pub const fn console(mut self, enabled: bool) -> Self {
        self.console = enabled;
        self
    }

    /// Switches every sink to JSON lines.
    pub const fn json(mut self, enabled: bool) -> Self {
        self.json = enabled;
        self
    }

    /// Also writes rolling log files into `dir`, created if missing.
    pub fn path(mut self, dir: impl Into<PathBuf>) -> Self {
        self.path = Some(dir.into());
        self
    }

    pub const fn rolling(mut self, rolling: Rolling) -> Self {
        self.rolling = rolling;
        self
    }

    pub const fn max_files(mut self, max_files: usize) -> Self {
        self.max_files = max_files;
        self
    }

    /// Installs the global subscriber.
    ///
    /// Keep the returned [`Logger`] alive until shutdown: dropping it stops
    /// the background file writer.
    ///
    /// # Errors
    /// [`LoggerError::InvalidConfiguration`] for a missing name, a bad filter
    /// or no enabled sink, [`LoggerError::Appender`] or
    /// [`LoggerError::Internal`] when the log directory is unusable, and
    /// [`LoggerError::Subscriber`] when a subscriber is already installed.
    pub fn init(self) -> Result<Logger, LoggerError> {
        let name = self.validate()?;
        let filter = self.env_filter_layer()?;

        let mut layers = Vec::new();
        if self.console {
            let console = layer().with_writer(std::io::stdout);
            layers.push(if self.json {
                console.json().flatten_event(true).boxed()
            } else {
                console.compact().with_ansi(true).boxed()
            });
        }

        let guard = if let Some(dir) = &self.path {
            fs::create_dir_all(dir).map_err(|e| LoggerError::Internal {
                message: e.to_string().into(),
                context: Some(format!("creating log directory {}", dir.display()).into()),
            })?;

            let appender = RollingFileAppender::builder()
                .rotation(self.rolling.into())
                .filename_prefix(&name)
                .filename_suffix(LOG_FILE_SUFFIX)
                .max_log_files(self.max_files)
                .build(dir)
                .context(format!("log directory {}", dir.display()))?;
            let (writer, guard) = tracing_appender::non_blocking(appender);

            let file = layer().with_writer(writer).with_ansi(false);
            layers.push(if self.json {
                file.json().flatten_event(true).boxed()
            } else {
                file.boxed()
            });
            Some(guard)
        } else {
            None
        };

        if layers.is_empty() {
            return Err(LoggerError::InvalidConfiguration {
                message: "no log sink enabled; turn on console or set a path".into(),
                context: Some(name.into()),
            });
        }

        tracing_subscriber::registry().with(filter).with(layers).try_init()?;
        tracing::debug!(logger = %name, level = %self.level, json = self.json, "Logger initialized");

        Ok(Logger { name, guard })
    }

    fn validate(&self) -> Result<String, LoggerError> {
        let name = match self.name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name.to_owned(),
            _ => {
                return Err(LoggerError::InvalidConfiguration {
                    message: "logger name cannot be empty".into(),
                    context: None,
                });
            },
        };
        if self.path.is_some() && self.max_files == 0 {
            return Err(LoggerError::InvalidConfiguration {
                message: "max_files must be greater than zero".into(),
                context: Some(name.into()),
            });
        }
        Ok(name)
    }

    fn env_filter_layer(&self) -> Result<EnvFilter, LoggerError> {
        let builder = EnvFilter::builder().with_default_directive(self.level.into());
        match &self.filter {
            None => Ok(builder.from_env_lossy()),
            Some(directives) => {
                builder.parse(directives).map_err(|e| LoggerError::InvalidConfiguration {
                    message: format!("invalid filter '{directives}': {e}").into(),
                    context: None,
                })
            },
        }
    }
}

/// Handle to the installed subscriber; owns the file writer's guard.
#[must_use = "dropping the logger stops the background file writer"]
#[derive(Debug)]
pub struct Logger {
    name: String,
    guard: Option<WorkerGuard>,
}

impl Logger {
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::default()
    }

    /// A builder preloaded from configuration.
    ///
    /// ```rust
    /// use sluice_logger::{LogConfig, Logger};
    ///
    /// let config = LogConfig { level: "verbose".to_owned(), ..LogConfig::default() };
    /// assert!(Logger::from_config("worker", &config).is_err());
    /// ```
    ///
    /// # Errors
    /// Returns [`LoggerError::InvalidConfiguration`] when `level` is not a
    /// level name.
    pub fn from_config(name: impl Into<String>, config: &LogConfig) -> Result<LoggerBuilder, LoggerError> {
        let level = LevelFilter::from_str(config.level.trim()).map_err(|e| {
            LoggerError::InvalidConfiguration {
                message: format!("unknown log level '{}': {e}", config.level).into(),
                context: None,
            }
        })?;

        let mut builder = Self::builder()
            .name(name)
            .level(level)
            .console(config.console)
            .json(config.json)
            .rolling(config.rolling)
            .max_files(config.max_files);
        if let Some(directives) = &config.filter {
            builder = builder.env_filter(directives.clone());
        }
        if let Some(dir) = &config.path {
            builder = builder.path(dir.clone());
        }
        Ok(builder)
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether a file sink is attached.
    #[must_use]
    pub const fn writes_files(&self) -> bool {
        self.guard.is_some()
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        if self.guard.is_some() {
            tracing::info!(logger = %self.name, "Logger shutting down, flushing log files");
        }
    }
}
