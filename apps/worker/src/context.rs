use sluice_kernel::WorkerConfig;
use std::time::{Duration, Instant};

/// Who is being invoked and how long it may run.
///
/// ```rust
/// use sluice_worker::InvocationContext;
/// use std::time::Duration;
///
/// let ctx = InvocationContext::new("req-1", "users-stream", Duration::from_secs(3));
/// assert!(ctx.remaining_time() <= Duration::from_secs(3));
/// assert!(!ctx.is_expired());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationContext {
    request_id: String,
    function_name: String,
    deadline: Instant,
}

impl InvocationContext {
    /// A context whose deadline is `budget` from now.
    pub fn new(request_id: impl Into<String>, function_name: impl Into<String>, budget: Duration) -> Self {
        Self::with_deadline(request_id, function_name, Instant::now() + budget)
    }

    pub fn with_deadline(
        request_id: impl Into<String>,
        function_name: impl Into<String>,
        deadline: Instant,
    ) -> Self {
        Self { request_id: request_id.into(), function_name: function_name.into(), deadline }
    }

    /// A context named after the worker with its configured timeout.
    pub fn for_worker(config: &WorkerConfig, request_id: impl Into<String>) -> Self {
        Self::new(request_id, config.name.clone(), config.timeout())
    }

    #[must_use]
    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    #[must_use]
    pub fn function_name(&self) -> &str {
        &self.function_name
    }

    #[must_use]
    pub const fn deadline(&self) -> Instant {
        self.deadline
    }

    /// Time left before the deadline, zero once it has passed.
    #[must_use]
    pub fn remaining_time(&self) -> Duration {
        self.deadline.saturating_duration_since(Instant::now())
    }

    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.remaining_time().is_zero()
    }
}
