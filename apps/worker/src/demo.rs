//! The `users` table wiring the binary ships with.

use serde::{Deserialize, Serialize};
use sluice_events::{
    ChangeEvent, Entity, EventFilter, Handler, Strategy, StreamError, StreamRouter, TableHandler,
};
use tracing::{error, info};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
}

impl Entity for User {
    const TABLE_NAME: &'static str = "users";
}

/// Welcomes new users, audits every change and notes deletions, all at once.
#[must_use]
pub fn users_table() -> TableHandler<User> {
    TableHandler::<User>::builder()
        .strategy(Strategy::Map)
        .handler(Handler::<User>::new("welcome", EventFilter::Insert, |events| async move {
            for user in events.iter().filter_map(|event| event.after()) {
                info!(user = user.id, username = %user.username, "Welcome aboard");
            }
            Ok(())
        }))
        .handler(Handler::<User>::new("audit", EventFilter::All, |events| async move {
            for event in &events {
                let changed = match &**event {
                    ChangeEvent::Modify { before, after } => before.username != after.username,
                    _ => true,
                };
                let id = event.after().or_else(|| event.before()).map(|user| user.id);
                info!(kind = %event.kind(), user = ?id, changed, "User row changed");
            }
            Ok(())
        }))
        .handler(Handler::<User>::new("farewell", EventFilter::Remove, |events| async move {
            info!(removed = events.len(), "Users removed");
            Ok(())
        }))
        .on_error(|failure| async move {
            error!(
                handler = failure.handler.name(),
                events = failure.events.len(),
                error = ?failure.error,
                "users handler failed"
            );
            Ok(())
        })
        .build()
}

/// A router serving the `users` table only.
///
/// # Errors
/// Never in practice; registration errors are propagated.
pub fn router() -> Result<StreamRouter, StreamError> {
    StreamRouter::builder().table(users_table()).build()
}
