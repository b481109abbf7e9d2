use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing_appender::rolling::Rotation;

pub(crate) const DEFAULT_LEVEL: &str = "info";
pub(crate) const DEFAULT_MAX_FILES: usize = 10;

/// Logging settings as they appear in a worker's configuration file.
///
/// Every field has a default, so an absent `[log]` table gives console
/// output at `info`.
///
/// ```rust
/// use sluice_logger::LogConfig;
///
/// let config: LogConfig = serde_json::from_str(r#"{ "level": "debug", "json": true }"#).unwrap();
/// assert_eq!(config.level, "debug");
/// assert!(config.json);
/// assert!(config.console);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Default maximum level (`trace`, `debug`, `info`, `warn`, `error`, `off`).
    pub level: String,
    /// Emit one JSON object per line instead of the compact text format.
    pub json: bool,
    /// Write to stdout.
    pub console: bool,
    /// Directory for rolling log files; no file output when absent.
    pub path: Option<PathBuf>,
    /// Extra filter directives, e.g. `sluice_events=trace`.
    pub filter: Option<String>,
    pub rolling: Rolling,
    /// Number of rolled files kept on disk.
    pub max_files: usize,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LEVEL.to_owned(),
            json: false,
            console: true,
            path: None,
            filter: None,
            rolling: Rolling::default(),
            max_files: DEFAULT_MAX_FILES,
        }
    }
}

/// How often the log file is rolled over.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rolling {
    Minutely,
    Hourly,
    #[default]
    Daily,
    Never,
}

impl From<Rolling> for Rotation {
    fn from(rolling: Rolling) -> Self {
        match rolling {
            Rolling::Minutely => Self::MINUTELY,
            Rolling::Hourly => Self::HOURLY,
            Rolling::Daily => Self::DAILY,
            Rolling::Never => Self::NEVER,
        }
    }
}
