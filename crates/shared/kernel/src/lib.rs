//! Configuration shared by sluice binaries.
//!
//! [`config::load_config`] layers a config file with `SLUICE__` environment
//! overrides; [`WorkerConfig`] is what a stream worker reads from it.
//!
//! ```rust,no_run
//! use sluice_kernel::{WorkerConfig, config::load_config};
//!
//! let cfg: WorkerConfig = load_config(Some("worker.toml")).unwrap();
//! println!("{} gives up after {:?}", cfg.name, cfg.timeout());
//! ```
pub mod config;
mod worker;

pub use worker::{DEFAULT_TIMEOUT_MS, DEFAULT_WORKER_NAME, WorkerConfig};
