use crate::error::StreamError;
use crate::locator::StreamArn;
use crate::record::{ChangeBatch, ChangeRecord};
use crate::table::SourceHandler;
use fxhash::FxHashMap;
use std::collections::hash_map::Entry;
use tracing::{debug, trace};

/// Routes each batch to the one table handler registered for its source table.
///
/// Built once at startup and read-only afterwards, so it can be shared
/// behind an `Arc` by concurrent invocations without locking.
///
/// # Examples
/// ```rust
/// use sluice_events::{ChangeBatch, StreamRouter, TableHandler};
///
/// #[derive(serde::Deserialize)]
/// struct Card { id: u64 }
///
/// impl sluice_events::Entity for Card {
///     const TABLE_NAME: &'static str = "cards";
/// }
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), sluice_events::StreamError> {
/// let router = StreamRouter::builder().table(TableHandler::<Card>::builder().build()).build()?;
/// assert!(router.contains("cards"));
///
/// router.route_batch(&ChangeBatch::default()).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct StreamRouter {
    tables: FxHashMap<String, Box<dyn SourceHandler>>,
}

impl StreamRouter {
    /// Registers the given table handlers.
    ///
    /// # Errors
    /// Returns [`StreamError::DuplicateSource`] naming the table when two
    /// handlers serve the same table.
    pub fn new<I>(handlers: I) -> Result<Self, StreamError>
    where
        I: IntoIterator<Item = Box<dyn SourceHandler>>,
    {
        let mut tables = FxHashMap::default();
        for handler in handlers {
            match tables.entry(handler.table_name().to_owned()) {
                Entry::Occupied(entry) => {
                    return Err(StreamError::DuplicateSource {
                        message: format!(
                            "You can't put more than one handler for given table: {}",
                            entry.key()
                        )
                        .into(),
                        context: None,
                    });
                },
                Entry::Vacant(entry) => {
                    debug!(table = entry.key().as_str(), "Registered table handler");
                    entry.insert(handler);
                },
            }
        }
        Ok(Self { tables })
    }

    #[must_use = "builders do nothing unless you call .build()"]
    pub fn builder() -> StreamRouterBuilder {
        StreamRouterBuilder::default()
    }

    /// Whether a handler is registered for `table`.
    #[must_use]
    pub fn contains(&self, table: &str) -> bool {
        self.tables.contains_key(table)
    }

    /// Names of all registered tables, in no particular order.
    pub fn tables(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }

    /// Routes a batch by the source ARN of its first record.
    ///
    /// Empty batches and batches from tables without a handler complete
    /// successfully without running anything.
    ///
    /// # Errors
    /// Returns [`StreamError::InvalidSourceArn`] for a malformed source ARN,
    /// and whatever the table handler's decoding step returns.
    pub async fn route(&self, records: &[ChangeRecord]) -> Result<(), StreamError> {
        let Some(first) = records.first() else {
            trace!("Empty change batch, nothing to route");
            return Ok(());
        };

        // Every record of a batch comes from the same stream.
        let source_arn = first.event_source_arn.as_str();
        debug!(source_arn, records = records.len(), "Routing change batch");

        let arn = StreamArn::parse(source_arn).ok_or_else(|| StreamError::InvalidSourceArn {
            message: source_arn.to_owned().into(),
            context: None,
        })?;

        match self.tables.get(arn.table_name()) {
            Some(handler) => handler.handle(records).await,
            None => {
                debug!(source_arn, table = arn.table_name(), "No table handler for stream, dropping batch");
                Ok(())
            },
        }
    }

    /// Same as [`StreamRouter::route`] for a whole payload.
    ///
    /// # Errors
    /// See [`StreamRouter::route`].
    pub async fn route_batch(&self, batch: &ChangeBatch) -> Result<(), StreamError> {
        self.route(&batch.records).await
    }
}

/// Collects table handlers before the duplicate check in [`StreamRouterBuilder::build`].
#[derive(Debug, Default)]
#[must_use = "builders do nothing unless you call .build()"]
pub struct StreamRouterBuilder {
    handlers: Vec<Box<dyn SourceHandler>>,
}

impl StreamRouterBuilder {
    pub fn table(mut self, handler: impl SourceHandler + 'static) -> Self {
        self.handlers.push(Box::new(handler));
        self
    }

    /// # Errors
    /// See [`StreamRouter::new`].
    pub fn build(self) -> Result<StreamRouter, StreamError> {
        StreamRouter::new(self.handlers)
    }
}
