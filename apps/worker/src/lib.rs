//! # Sluice Worker
//!
//! Hosts a [`StreamRouter`](sluice_events::StreamRouter) the way a serverless
//! runtime would: each invocation carries a change batch and an
//! [`InvocationContext`] with a deadline, and the batch either fully succeeds
//! or fails as a whole so the platform can retry it.
//!
//! ## Example
//! ```no_run
//! use sluice_worker::{InvocationContext, Worker, demo};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let worker = Worker::new(demo::router()?);
//!     let ctx = InvocationContext::new("req-1", "users-stream", Duration::from_secs(30));
//!     worker.invoke_json(br#"{"Records": []}"#, &ctx).await?;
//!     Ok(())
//! }
//! ```

mod context;
pub mod demo;
mod error;
mod worker;

pub use context::InvocationContext;
pub use error::{InvocationError, InvocationErrorExt};
pub use worker::Worker;
