//! Wire shape of an incoming change batch.

use serde::{Deserialize, Serialize};
use sluice_codec::AttributeMap;
use std::fmt;

/// The kind of row change a record describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChangeKind {
    Insert,
    Modify,
    Remove,
}

impl ChangeKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Insert => "INSERT",
            Self::Modify => "MODIFY",
            Self::Remove => "REMOVE",
        }
    }
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A batch as delivered by the change log. All records share one source.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChangeBatch {
    #[serde(rename = "Records", default)]
    pub records: Vec<ChangeRecord>,
}

impl ChangeBatch {
    #[must_use]
    pub const fn new(records: Vec<ChangeRecord>) -> Self {
        Self { records }
    }
}

/// One row change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeRecord {
    #[serde(rename = "eventID", default)]
    pub event_id: String,
    pub event_name: ChangeKind,
    #[serde(default)]
    pub event_version: String,
    #[serde(default)]
    pub event_source: String,
    #[serde(default)]
    pub aws_region: String,
    #[serde(rename = "eventSourceARN")]
    pub event_source_arn: String,
    pub dynamodb: StreamData,
}

/// Images and provenance of a [`ChangeRecord`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StreamData {
    /// Seconds since the epoch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approximate_creation_date_time: Option<f64>,
    #[serde(default)]
    pub keys: AttributeMap,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_image: Option<AttributeMap>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_image: Option<AttributeMap>,
    #[serde(default)]
    pub sequence_number: String,
    #[serde(default)]
    pub size_bytes: u64,
    #[serde(default)]
    pub stream_view_type: String,
}

impl ChangeRecord {
    /// A record carrying only the row as it was inserted.
    #[must_use]
    pub fn insert(source_arn: impl Into<String>, new_image: AttributeMap) -> Self {
        Self::with_images(ChangeKind::Insert, source_arn.into(), None, Some(new_image))
    }

    /// A record carrying the row before and after the update.
    #[must_use]
    pub fn modify(
        source_arn: impl Into<String>,
        old_image: AttributeMap,
        new_image: AttributeMap,
    ) -> Self {
        Self::with_images(ChangeKind::Modify, source_arn.into(), Some(old_image), Some(new_image))
    }

    /// A record carrying only the row as it was before deletion.
    #[must_use]
    pub fn remove(source_arn: impl Into<String>, old_image: AttributeMap) -> Self {
        Self::with_images(ChangeKind::Remove, source_arn.into(), Some(old_image), None)
    }

    fn with_images(
        kind: ChangeKind,
        event_source_arn: String,
        old_image: Option<AttributeMap>,
        new_image: Option<AttributeMap>,
    ) -> Self {
        Self {
            event_id: String::new(),
            event_name: kind,
            event_version: "1.1".to_owned(),
            event_source: "aws:dynamodb".to_owned(),
            aws_region: String::new(),
            event_source_arn,
            dynamodb: StreamData {
                new_image,
                old_image,
                stream_view_type: "NEW_AND_OLD_IMAGES".to_owned(),
                ..StreamData::default()
            },
        }
    }

    #[must_use]
    pub const fn kind(&self) -> ChangeKind {
        self.event_name
    }
}
