use crate::error::StreamError;
use crate::event::ChangeEvent;
use crate::record::ChangeKind;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The event kinds a handler wants to see.
///
/// Parses from and prints as `"INSERT"`, `"MODIFY"`, `"REMOVE"`,
/// `"INSERT, MODIFY"`, `"MODIFY, REMOVE"`, `"INSERT, REMOVE"` or `"ALL"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum EventFilter {
    Insert,
    Modify,
    Remove,
    InsertModify,
    ModifyRemove,
    InsertRemove,
    All,
}

impl EventFilter {
    /// Every filter, in declaration order.
    pub const VARIANTS: [Self; 7] = [
        Self::Insert,
        Self::Modify,
        Self::Remove,
        Self::InsertModify,
        Self::ModifyRemove,
        Self::InsertRemove,
        Self::All,
    ];

    #[must_use]
    pub const fn matches(self, kind: ChangeKind) -> bool {
        match self {
            Self::Insert => matches!(kind, ChangeKind::Insert),
            Self::Modify => matches!(kind, ChangeKind::Modify),
            Self::Remove => matches!(kind, ChangeKind::Remove),
            Self::InsertModify => matches!(kind, ChangeKind::Insert | ChangeKind::Modify),
            Self::ModifyRemove => matches!(kind, ChangeKind::Modify | ChangeKind::Remove),
            Self::InsertRemove => matches!(kind, ChangeKind::Insert | ChangeKind::Remove),
            Self::All => true,
        }
    }

    #[must_use]
    pub const fn admits<T>(self, event: &ChangeEvent<T>) -> bool {
        self.matches(event.kind())
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Insert => "INSERT",
            Self::Modify => "MODIFY",
            Self::Remove => "REMOVE",
            Self::InsertModify => "INSERT, MODIFY",
            Self::ModifyRemove => "MODIFY, REMOVE",
            Self::InsertRemove => "INSERT, REMOVE",
            Self::All => "ALL",
        }
    }

    const fn from_kinds(insert: bool, modify: bool, remove: bool) -> Option<Self> {
        match (insert, modify, remove) {
            (true, false, false) => Some(Self::Insert),
            (false, true, false) => Some(Self::Modify),
            (false, false, true) => Some(Self::Remove),
            (true, true, false) => Some(Self::InsertModify),
            (false, true, true) => Some(Self::ModifyRemove),
            (true, false, true) => Some(Self::InsertRemove),
            (true, true, true) => Some(Self::All),
            (false, false, false) => None,
        }
    }
}

impl fmt::Display for EventFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<ChangeKind> for EventFilter {
    fn from(kind: ChangeKind) -> Self {
        match kind {
            ChangeKind::Insert => Self::Insert,
            ChangeKind::Modify => Self::Modify,
            ChangeKind::Remove => Self::Remove,
        }
    }
}

impl FromStr for EventFilter {
    type Err = StreamError;

    /// Kinds are comma separated, case-insensitive and order-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || StreamError::InvalidFilter { message: format!("'{s}'").into(), context: None };

        let (mut insert, mut modify, mut remove) = (false, false, false);
        for part in s.split(',').map(str::trim) {
            match part.to_ascii_uppercase().as_str() {
                "INSERT" => insert = true,
                "MODIFY" => modify = true,
                "REMOVE" => remove = true,
                "ALL" => (insert, modify, remove) = (true, true, true),
                _ => return Err(invalid()),
            }
        }
        Self::from_kinds(insert, modify, remove).ok_or_else(invalid)
    }
}

impl TryFrom<String> for EventFilter {
    type Error = StreamError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<EventFilter> for String {
    fn from(filter: EventFilter) -> Self {
        filter.as_str().to_owned()
    }
}
