use crate::context::InvocationContext;
use crate::error::{InvocationError, InvocationErrorExt};
use sluice_events::{ChangeBatch, StreamRouter};
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, warn};

/// Runs one router per invocation, within the invocation's deadline.
///
/// Cheap to clone; clones share the router.
#[derive(Debug, Clone)]
pub struct Worker {
    router: Arc<StreamRouter>,
}

impl Worker {
    #[must_use]
    pub fn new(router: StreamRouter) -> Self {
        Self { router: Arc::new(router) }
    }

    #[must_use]
    pub const fn from_shared(router: Arc<StreamRouter>) -> Self {
        Self { router }
    }

    #[must_use]
    pub fn router(&self) -> &StreamRouter {
        &self.router
    }

    /// Routes `batch`, giving up when the context's deadline passes.
    ///
    /// On timeout, handlers still running are dropped at their next await
    /// point and the whole batch counts as failed.
    ///
    /// # Errors
    /// [`InvocationError::Stream`] when routing fails and
    /// [`InvocationError::Timeout`] when the deadline passes first.
    pub async fn invoke(&self, batch: &ChangeBatch, ctx: &InvocationContext) -> Result<(), InvocationError> {
        let records = batch.records.len();
        info!(
            request_id = ctx.request_id(),
            function = ctx.function_name(),
            records,
            "Invocation started"
        );

        if ctx.is_expired() {
            warn!(request_id = ctx.request_id(), "Deadline passed before routing started");
            return Err(timed_out(ctx));
        }

        let started = Instant::now();
        let outcome =
            match tokio::time::timeout(ctx.remaining_time(), self.router.route_batch(batch)).await {
                Ok(routed) => routed.context(format!("request {}", ctx.request_id())),
                Err(_) => Err(timed_out(ctx)),
            };

        match &outcome {
            Ok(()) => info!(
                request_id = ctx.request_id(),
                records,
                elapsed = ?started.elapsed(),
                "Invocation succeeded"
            ),
            Err(error) => error!(
                request_id = ctx.request_id(),
                records,
                elapsed = ?started.elapsed(),
                %error,
                "Invocation failed"
            ),
        }
        outcome
    }

    /// Parses a raw stream payload and invokes with it.
    ///
    /// # Errors
    /// [`InvocationError::Payload`] when `payload` is not a change batch,
    /// otherwise as [`Worker::invoke`].
    pub async fn invoke_json(&self, payload: &[u8], ctx: &InvocationContext) -> Result<(), InvocationError> {
        let batch: ChangeBatch = serde_json::from_slice(payload)
            .context(format!("request {}", ctx.request_id()))
            .inspect_err(|error| error!(request_id = ctx.request_id(), %error, "Rejected payload"))?;
        self.invoke(&batch, ctx).await
    }
}

fn timed_out(ctx: &InvocationContext) -> InvocationError {
    InvocationError::Timeout {
        message: format!("{} exceeded its deadline", ctx.function_name()).into(),
        context: Some(format!("request {}", ctx.request_id()).into()),
    }
}
