use crate::error::{StreamError, StreamErrorExt};
use crate::record::{ChangeKind, ChangeRecord};
use serde::de::DeserializeOwned;
use sluice_codec::{AttributeMap, CodecError};
use std::sync::Arc;

/// A record type stored in a table whose stream is consumed.
///
/// The table name decides which stream a [`TableHandler`](crate::TableHandler)
/// for this type serves.
pub trait Entity: DeserializeOwned + Send + Sync + 'static {
    /// Name of the table the rows live in.
    const TABLE_NAME: &'static str;

    /// Decodes one image. Defaults to the serde bridge of `sluice-codec`.
    ///
    /// # Errors
    /// Returns a [`CodecError`] when the image does not fit the type.
    fn from_image(image: &AttributeMap) -> Result<Self, CodecError> {
        sluice_codec::unmarshal(image)
    }
}

/// A decoded row change with typed snapshots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeEvent<T> {
    Insert { after: T },
    Modify { before: T, after: T },
    Remove { before: T },
}

impl<T> ChangeEvent<T> {
    #[must_use]
    pub const fn kind(&self) -> ChangeKind {
        match self {
            Self::Insert { .. } => ChangeKind::Insert,
            Self::Modify { .. } => ChangeKind::Modify,
            Self::Remove { .. } => ChangeKind::Remove,
        }
    }

    /// The row before the change, absent for inserts.
    #[must_use]
    pub const fn before(&self) -> Option<&T> {
        match self {
            Self::Insert { .. } => None,
            Self::Modify { before, .. } | Self::Remove { before } => Some(before),
        }
    }

    /// The row after the change, absent for removals.
    #[must_use]
    pub const fn after(&self) -> Option<&T> {
        match self {
            Self::Remove { .. } => None,
            Self::Insert { after } | Self::Modify { after, .. } => Some(after),
        }
    }
}

/// Decodes a single record. Images the kind does not use are ignored.
///
/// # Errors
/// Returns [`StreamError::MissingImage`] when a required image is absent and
/// [`StreamError::Decode`] when an image does not decode into `T`.
pub fn decode<T: Entity>(record: &ChangeRecord) -> Result<ChangeEvent<T>, StreamError> {
    let read = |image: Option<&AttributeMap>, side: &'static str| -> Result<T, StreamError> {
        let image = image.ok_or_else(|| StreamError::MissingImage {
            message: format!("{} record '{}' has no {side}", record.kind(), record.event_id)
                .into(),
            context: Some(T::TABLE_NAME.into()),
        })?;
        T::from_image(image)
            .context(format!("{} of {} record '{}'", side, record.kind(), record.event_id))
    };

    let data = &record.dynamodb;
    Ok(match record.kind() {
        ChangeKind::Insert => ChangeEvent::Insert { after: read(data.new_image.as_ref(), "NewImage")? },
        ChangeKind::Modify => ChangeEvent::Modify {
            before: read(data.old_image.as_ref(), "OldImage")?,
            after: read(data.new_image.as_ref(), "NewImage")?,
        },
        ChangeKind::Remove => ChangeEvent::Remove { before: read(data.old_image.as_ref(), "OldImage")? },
    })
}

/// Decodes a whole batch eagerly; the first failure aborts it.
///
/// # Errors
/// See [`decode`].
pub fn decode_batch<T: Entity>(
    records: &[ChangeRecord],
) -> Result<Vec<Arc<ChangeEvent<T>>>, StreamError> {
    records.iter().map(|record| decode(record).map(Arc::new)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use sluice_codec::AttributeValue;

    #[derive(Debug, PartialEq, Deserialize)]
    struct Note {
        id: u32,
    }

    impl Entity for Note {
        const TABLE_NAME: &'static str = "notes";
    }

    fn image(id: u32) -> AttributeMap {
        AttributeMap::from([("id".to_owned(), AttributeValue::N(id.to_string()))])
    }

    #[test]
    fn test_each_kind_reads_its_images() {
        let arn = "arn:aws:dynamodb:us-east-1:1:table/notes/stream/x";

        let insert = decode::<Note>(&ChangeRecord::insert(arn, image(1))).unwrap();
        assert_eq!(insert, ChangeEvent::Insert { after: Note { id: 1 } });

        let modify = decode::<Note>(&ChangeRecord::modify(arn, image(1), image(2))).unwrap();
        assert_eq!(modify.before(), Some(&Note { id: 1 }));
        assert_eq!(modify.after(), Some(&Note { id: 2 }));

        let remove = decode::<Note>(&ChangeRecord::remove(arn, image(3))).unwrap();
        assert_eq!(remove, ChangeEvent::Remove { before: Note { id: 3 } });
        assert_eq!(remove.kind(), ChangeKind::Remove);
    }

    #[test]
    fn test_unused_image_is_ignored() {
        let mut record = ChangeRecord::insert("arn", image(1));
        record.dynamodb.old_image = Some(AttributeMap::new());
        assert!(decode::<Note>(&record).is_ok());
    }

    #[test]
    fn test_modify_without_new_image_fails() {
        let mut record = ChangeRecord::modify("arn", image(1), image(2));
        record.dynamodb.new_image = None;
        let err = decode::<Note>(&record).unwrap_err();
        assert!(matches!(err, StreamError::MissingImage { .. }));
    }

    #[test]
    fn test_malformed_image_aborts_batch() {
        let records = vec![
            ChangeRecord::insert("arn", image(1)),
            ChangeRecord::insert("arn", AttributeMap::new()),
        ];
        let err = decode_batch::<Note>(&records).unwrap_err();
        assert!(matches!(err, StreamError::Decode { .. }));
    }
}
