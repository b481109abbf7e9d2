use crate::event::ChangeEvent;
use crate::filter::EventFilter;
use futures::FutureExt;
use futures::future::BoxFuture;
use std::any::Any;
use std::borrow::Cow;
use std::fmt;
use std::future::Future;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

/// Decoded events handed to a handler, shared rather than cloned.
pub type Events<T> = Vec<Arc<ChangeEvent<T>>>;

type Callback<T> = Arc<dyn Fn(Events<T>) -> BoxFuture<'static, anyhow::Result<()>> + Send + Sync>;

/// How a table handler runs its handlers for one batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// One after another in registration order; each finishes before the next starts.
    #[default]
    Series,
    /// All at once; the batch completes when every handler has settled.
    Map,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Series => "Series",
            Self::Map => "Map",
        })
    }
}

/// A named callback interested in some event kinds.
///
/// # Examples
/// ```rust
/// use sluice_events::{EventFilter, Handler};
/// # #[derive(serde::Deserialize)] struct User;
/// # impl sluice_events::Entity for User { const TABLE_NAME: &'static str = "users"; }
///
/// let welcome = Handler::<User>::new("welcome mail", EventFilter::Insert, |events| async move {
///     assert!(!events.is_empty());
///     Ok(())
/// });
/// assert_eq!(welcome.name(), "welcome mail");
/// ```
pub struct Handler<T> {
    name: Cow<'static, str>,
    filter: EventFilter,
    callback: Callback<T>,
}

impl<T: Send + Sync + 'static> Handler<T> {
    pub fn new<F, Fut>(name: impl Into<Cow<'static, str>>, filter: EventFilter, callback: F) -> Self
    where
        F: Fn(Events<T>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        Self { name: name.into(), filter, callback: Arc::new(move |events| callback(events).boxed()) }
    }

    /// Display name, for diagnostics only.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn filter(&self) -> EventFilter {
        self.filter
    }

    /// The events this handler wants, in batch order.
    #[must_use]
    pub fn select(&self, events: &[Arc<ChangeEvent<T>>]) -> Events<T> {
        events.iter().filter(|event| self.filter.admits(event)).cloned().collect()
    }

    /// Runs the callback, turning a panic into an error.
    pub(crate) async fn call(&self, events: Events<T>) -> anyhow::Result<()> {
        let callback = &self.callback;
        let future = panic::catch_unwind(AssertUnwindSafe(|| callback(events)))
            .map_err(|payload| panicked(&self.name, payload.as_ref()))?;
        AssertUnwindSafe(future)
            .catch_unwind()
            .await
            .map_err(|payload| panicked(&self.name, payload.as_ref()))?
    }
}

impl<T> Clone for Handler<T> {
    fn clone(&self) -> Self {
        Self { name: self.name.clone(), filter: self.filter, callback: Arc::clone(&self.callback) }
    }
}

impl<T> fmt::Debug for Handler<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handler")
            .field("name", &self.name)
            .field("filter", &self.filter)
            .finish_non_exhaustive()
    }
}

/// Everything the error sink learns about a failed handler.
pub struct HandlerFailure<T> {
    /// The registration whose callback failed.
    pub handler: Handler<T>,
    /// The whole decoded batch, not just the handler's selection.
    pub events: Events<T>,
    pub error: anyhow::Error,
}

impl<T> fmt::Debug for HandlerFailure<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerFailure")
            .field("handler", &self.handler.name)
            .field("events", &self.events.len())
            .field("error", &self.error)
            .finish()
    }
}

pub(crate) type ErrorSink<T> =
    Arc<dyn Fn(HandlerFailure<T>) -> BoxFuture<'static, anyhow::Result<()>> + Send + Sync>;

pub(crate) fn error_sink<T, F, Fut>(sink: F) -> ErrorSink<T>
where
    F: Fn(HandlerFailure<T>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
{
    Arc::new(move |failure| sink(failure).boxed())
}

/// Runs the sink; its own failure or panic is returned, never raised.
pub(crate) async fn report<T>(sink: &ErrorSink<T>, failure: HandlerFailure<T>) -> anyhow::Result<()> {
    let future = panic::catch_unwind(AssertUnwindSafe(|| sink(failure)))
        .map_err(|payload| panicked("error sink", payload.as_ref()))?;
    AssertUnwindSafe(future)
        .catch_unwind()
        .await
        .map_err(|payload| panicked("error sink", payload.as_ref()))?
}

fn panicked(who: &str, payload: &(dyn Any + Send)) -> anyhow::Error {
    let message = payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_owned())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "non-string panic payload".to_owned());
    anyhow::anyhow!("{who} panicked: {message}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strategy_defaults_to_series() {
        assert_eq!(Strategy::default(), Strategy::Series);
        assert_eq!(Strategy::Series.to_string(), "Series");
        assert_eq!(Strategy::Map.to_string(), "Map");
    }
}
