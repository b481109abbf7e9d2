use serde::{Deserialize, Serialize};
use sluice_logger::LogConfig;
use std::time::Duration;

pub const DEFAULT_WORKER_NAME: &str = "sluice-worker";
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Settings of a stream worker process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkerConfig {
    /// Reported as the function name and used to name log files.
    pub name: String,
    /// Wall-clock budget of one invocation, in milliseconds.
    pub timeout_ms: u64,
    pub log: LogConfig,
}

impl WorkerConfig {
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_WORKER_NAME.to_owned(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            log: LogConfig::default(),
        }
    }
}
