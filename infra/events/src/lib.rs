//! # Change Events
//!
//! Routes batches of change-stream records to typed handler sets, one per
//! table, and fans each batch out to the handlers that asked for its event
//! kinds.
//!
//! ## Overview
//!
//! * [`StreamRouter`] picks the [`TableHandler`] whose table matches the
//!   batch's source ARN ([`StreamArn`]). Unknown tables are dropped quietly.
//! * [`TableHandler`] decodes the batch once into [`ChangeEvent`]s of its
//!   [`Entity`] type, then runs each [`Handler`] on the events its
//!   [`EventFilter`] admits, in [`Strategy::Series`] or [`Strategy::Map`].
//! * A failing handler is reported to the table's error sink as a
//!   [`HandlerFailure`]; its siblings still run and the batch still succeeds.
//!
//! Only decoding, ARN and registration problems surface as [`StreamError`].
//!
//! # Example
//!
//! ```rust
//! use sluice_codec::marshal;
//! use sluice_events::{ChangeRecord, Entity, EventFilter, Handler, StreamRouter, TableHandler};
//!
//! #[derive(serde::Serialize, serde::Deserialize)]
//! struct User { id: u64, username: String }
//!
//! impl Entity for User {
//!     const TABLE_NAME: &'static str = "users";
//! }
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> anyhow::Result<()> {
//!     let users = TableHandler::<User>::builder()
//!         .handler(Handler::new("greet", EventFilter::Insert, |events| async move {
//!             assert_eq!(events.len(), 1);
//!             Ok(())
//!         }))
//!         .build();
//!     let router = StreamRouter::builder().table(users).build()?;
//!
//!     let arn = "arn:aws:dynamodb:us-east-1:123456789012:table/users/stream/2024-01-01T00:00:00.000";
//!     let image = marshal(&User { id: 100, username: "MEMEME".to_owned() })?;
//!     router.route(&[ChangeRecord::insert(arn, image)]).await?;
//!     Ok(())
//! }
//! ```

mod error;
mod event;
mod filter;
mod handler;
mod locator;
mod record;
mod router;
mod table;

pub use error::{StreamError, StreamErrorExt};
pub use event::{ChangeEvent, Entity, decode, decode_batch};
pub use filter::EventFilter;
pub use handler::{Events, Handler, HandlerFailure, Strategy};
pub use locator::StreamArn;
pub use record::{ChangeBatch, ChangeKind, ChangeRecord, StreamData};
pub use router::{StreamRouter, StreamRouterBuilder};
pub use table::{SourceHandler, TableHandler, TableHandlerBuilder};
