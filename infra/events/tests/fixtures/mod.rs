#![allow(dead_code)]

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use sluice_codec::{AttributeMap, marshal};
use sluice_events::{ChangeKind, ChangeRecord, Entity, EventFilter, Handler};
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub username: String,
}

impl Entity for User {
    const TABLE_NAME: &'static str = "users";
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub id: u64,
    pub title: String,
}

impl Entity for Card {
    const TABLE_NAME: &'static str = "cards";
}

pub fn stream_arn(table: &str) -> String {
    format!("arn:aws:dynamodb:us-east-1:921281748045:table/{table}/stream/2017-12-22T02:02:25.496")
}

pub fn user_image(id: u64) -> AttributeMap {
    marshal(&User { id, username: format!("user-{id}") }).expect("user should marshal")
}

pub fn insert(id: u64) -> ChangeRecord {
    ChangeRecord::insert(stream_arn(User::TABLE_NAME), user_image(id))
}

pub fn modify(id: u64) -> ChangeRecord {
    ChangeRecord::modify(stream_arn(User::TABLE_NAME), user_image(id), user_image(id + 1000))
}

pub fn remove(id: u64) -> ChangeRecord {
    ChangeRecord::remove(stream_arn(User::TABLE_NAME), user_image(id))
}

/// INSERT 1, MODIFY 2, REMOVE 3, INSERT 4, MODIFY 5.
pub fn mixed_batch() -> Vec<ChangeRecord> {
    vec![insert(1), modify(2), remove(3), insert(4), modify(5)]
}

/// What each handler saw: its name and the (kind, id) of every event.
#[derive(Debug, Clone, Default)]
pub struct Calls(Arc<Mutex<Vec<(String, Vec<(ChangeKind, u64)>)>>>);

impl Calls {
    pub fn of(&self, name: &str) -> Vec<Vec<(ChangeKind, u64)>> {
        self.0.lock().iter().filter(|(n, _)| n == name).map(|(_, seen)| seen.clone()).collect()
    }

    pub fn names(&self) -> Vec<String> {
        self.0.lock().iter().map(|(name, _)| name.clone()).collect()
    }
}

/// A handler that records every call and succeeds.
pub fn recording(name: &'static str, filter: EventFilter, calls: &Calls) -> Handler<User> {
    let calls = calls.clone();
    Handler::<User>::new(name, filter, move |events| {
        let seen = events
            .iter()
            .map(|event| {
                let user = event.before().or_else(|| event.after()).expect("event has a row");
                (event.kind(), user.id)
            })
            .collect();
        calls.0.lock().push((name.to_owned(), seen));
        async { Ok(()) }
    })
}

/// A handler that records its call and then fails.
pub fn failing(name: &'static str, filter: EventFilter, calls: &Calls) -> Handler<User> {
    let calls = calls.clone();
    Handler::new(name, filter, move |events| {
        calls.0.lock().push((name.to_owned(), events.iter().map(|e| (e.kind(), 0)).collect()));
        async move { Err(anyhow::anyhow!("{name} exploded")) }
    })
}
