use crate::error::StreamError;
use crate::event::{Entity, decode_batch};
use crate::handler::{ErrorSink, Events, Handler, HandlerFailure, Strategy, error_sink, report};
use crate::record::ChangeRecord;
use futures::future::{BoxFuture, join_all};
use std::fmt;
use std::future::Future;
use tracing::{debug, error, trace, warn};

/// A handler set as seen by the router: something that consumes the batches
/// of one table.
pub trait SourceHandler: fmt::Debug + Send + Sync {
    /// The table whose stream this handler consumes.
    fn table_name(&self) -> &str;

    /// Decodes and dispatches one batch.
    fn handle<'a>(&'a self, records: &'a [ChangeRecord]) -> BoxFuture<'a, Result<(), StreamError>>;
}

/// The handlers registered for one entity type, how to run them and where
/// their failures go.
///
/// # Examples
/// ```rust
/// use sluice_events::{EventFilter, Handler, Strategy, TableHandler};
///
/// #[derive(serde::Deserialize)]
/// struct User { id: u64 }
///
/// impl sluice_events::Entity for User {
///     const TABLE_NAME: &'static str = "users";
/// }
///
/// let users = TableHandler::<User>::builder()
///     .strategy(Strategy::Map)
///     .handler(Handler::<User>::new("index", EventFilter::All, |events| async move {
///         for event in &events {
///             let _ = event.after().map(|user| user.id);
///         }
///         Ok(())
///     }))
///     .on_error(|failure| async move {
///         eprintln!("{} failed: {}", failure.handler.name(), failure.error);
///         Ok(())
///     })
///     .build();
/// assert_eq!(users.table_name(), "users");
/// ```
pub struct TableHandler<T> {
    strategy: Strategy,
    handlers: Vec<Handler<T>>,
    sink: ErrorSink<T>,
}

impl<T: Entity> TableHandler<T> {
    /// Builds a table handler with an explicit error sink.
    pub fn new<F, Fut>(strategy: Strategy, handlers: Vec<Handler<T>>, on_error: F) -> Self
    where
        F: Fn(HandlerFailure<T>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        Self { strategy, handlers, sink: error_sink(on_error) }
    }

    #[must_use = "builders do nothing unless you call .build()"]
    pub fn builder() -> TableHandlerBuilder<T> {
        TableHandlerBuilder { strategy: Strategy::default(), handlers: Vec::new(), sink: None }
    }

    #[must_use]
    pub const fn table_name(&self) -> &'static str {
        T::TABLE_NAME
    }

    #[must_use]
    pub const fn strategy(&self) -> Strategy {
        self.strategy
    }

    #[must_use]
    pub fn handlers(&self) -> &[Handler<T>] {
        &self.handlers
    }

    /// Decodes the batch once and runs every interested handler on it.
    ///
    /// Handler failures go to the error sink and never fail the call.
    ///
    /// # Errors
    /// Returns [`StreamError::Decode`] or [`StreamError::MissingImage`] when a
    /// record cannot be decoded; no handler runs in that case.
    pub async fn dispatch(&self, records: &[ChangeRecord]) -> Result<(), StreamError> {
        let events = decode_batch::<T>(records)?;
        debug!(
            table = T::TABLE_NAME,
            strategy = %self.strategy,
            records = events.len(),
            handlers = self.handlers.len(),
            "Dispatching change batch"
        );

        match self.strategy {
            Strategy::Series => {
                for handler in &self.handlers {
                    self.execute(handler, &events).await;
                }
            },
            Strategy::Map => {
                join_all(self.handlers.iter().map(|handler| self.execute(handler, &events))).await;
            },
        }

        Ok(())
    }

    async fn execute(&self, handler: &Handler<T>, events: &Events<T>) {
        let selected = handler.select(events);
        if selected.is_empty() {
            trace!(table = T::TABLE_NAME, handler = handler.name(), "No matching events, skipping");
            return;
        }

        let matched = selected.len();
        debug!(table = T::TABLE_NAME, handler = handler.name(), matched, "Running handler");
        let Err(error) = handler.call(selected).await else {
            trace!(table = T::TABLE_NAME, handler = handler.name(), "Handler finished");
            return;
        };

        debug!(table = T::TABLE_NAME, handler = handler.name(), %error, "Handler failed");
        let failure = HandlerFailure { handler: handler.clone(), events: events.clone(), error };
        if let Err(sink_error) = report(&self.sink, failure).await {
            warn!(
                table = T::TABLE_NAME,
                handler = handler.name(),
                error = %sink_error,
                "Error sink failed; dropping the report"
            );
        }
    }
}

impl<T: Entity> SourceHandler for TableHandler<T> {
    fn table_name(&self) -> &str {
        T::TABLE_NAME
    }

    fn handle<'a>(&'a self, records: &'a [ChangeRecord]) -> BoxFuture<'a, Result<(), StreamError>> {
        Box::pin(self.dispatch(records))
    }
}

impl<T> fmt::Debug for TableHandler<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TableHandler")
            .field("strategy", &self.strategy)
            .field("handlers", &self.handlers)
            .finish_non_exhaustive()
    }
}

/// A fluent builder for [`TableHandler`].
#[must_use = "builders do nothing unless you call .build()"]
pub struct TableHandlerBuilder<T> {
    strategy: Strategy,
    handlers: Vec<Handler<T>>,
    sink: Option<ErrorSink<T>>,
}

impl<T: Entity> TableHandlerBuilder<T> {
    pub const fn strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Appends a handler; order matters for [`Strategy::Series`].
    pub fn handler(mut self, handler: Handler<T>) -> Self {
        self.handlers.push(handler);
        self
    }

    pub fn handlers(mut self, handlers: impl IntoIterator<Item = Handler<T>>) -> Self {
        self.handlers.extend(handlers);
        self
    }

    /// Sets the error sink. Without one, failures are logged at error level.
    pub fn on_error<F, Fut>(mut self, on_error: F) -> Self
    where
        F: Fn(HandlerFailure<T>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        self.sink = Some(error_sink(on_error));
        self
    }

    pub fn build(self) -> TableHandler<T> {
        let sink = self.sink.unwrap_or_else(|| error_sink(log_failure::<T>));
        TableHandler { strategy: self.strategy, handlers: self.handlers, sink }
    }
}

impl<T> fmt::Debug for TableHandlerBuilder<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TableHandlerBuilder")
            .field("strategy", &self.strategy)
            .field("handlers", &self.handlers)
            .field("sink", &self.sink.is_some())
            .finish()
    }
}

#[allow(clippy::unused_async)]
async fn log_failure<T: Entity>(failure: HandlerFailure<T>) -> anyhow::Result<()> {
    error!(
        table = T::TABLE_NAME,
        handler = failure.handler.name(),
        filter = %failure.handler.filter(),
        events = failure.events.len(),
        error = ?failure.error,
        "Change handler failed"
    );
    Ok(())
}
