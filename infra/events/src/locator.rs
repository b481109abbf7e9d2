//! Stream ARN parsing.
//!
//! `arn:<partition>:dynamodb:<region>:<account-id>:table/<table>/stream/<label>`

use std::fmt;

const SCHEME: &str = "arn";
const SERVICE: &str = "dynamodb";
const TABLE_PREFIX: &str = "table/";
const STREAM_SEPARATOR: &str = "/stream/";

/// The identifying parts of a table stream ARN, borrowed from the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StreamArn<'a> {
    partition: &'a str,
    region: &'a str,
    account_id: &'a str,
    table_name: &'a str,
    stream_label: &'a str,
}

impl<'a> StreamArn<'a> {
    /// Parses a stream ARN, returning `None` when the input has another shape.
    ///
    /// # Examples
    /// ```rust
    /// use sluice_events::StreamArn;
    ///
    /// let arn = StreamArn::parse(
    ///     "arn:aws:dynamodb:us-east-1:921281748045:table/questions/stream/2017-12-22T02:02:25.496",
    /// )
    /// .unwrap();
    /// assert_eq!(arn.region(), "us-east-1");
    /// assert_eq!(arn.account_id(), "921281748045");
    /// assert_eq!(arn.table_name(), "questions");
    ///
    /// assert!(StreamArn::parse("arn:aws:s3:::bucket").is_none());
    /// ```
    #[must_use]
    pub fn parse(arn: &'a str) -> Option<Self> {
        let mut fields = arn.splitn(6, ':');
        let (scheme, partition, service, region, account_id, resource) = (
            fields.next()?,
            fields.next()?,
            fields.next()?,
            fields.next()?,
            fields.next()?,
            fields.next()?,
        );

        if scheme != SCHEME || service != SERVICE {
            return None;
        }
        if !is_label(partition) || !is_label(region) || !is_account_id(account_id) {
            return None;
        }

        let (table_name, stream_label) =
            resource.strip_prefix(TABLE_PREFIX)?.split_once(STREAM_SEPARATOR)?;
        if !is_table_name(table_name)
            || stream_label.is_empty()
            || stream_label.chars().any(char::is_whitespace)
        {
            return None;
        }

        Some(Self { partition, region, account_id, table_name, stream_label })
    }

    #[must_use]
    pub const fn partition(&self) -> &'a str {
        self.partition
    }

    #[must_use]
    pub const fn region(&self) -> &'a str {
        self.region
    }

    #[must_use]
    pub const fn account_id(&self) -> &'a str {
        self.account_id
    }

    #[must_use]
    pub const fn table_name(&self) -> &'a str {
        self.table_name
    }

    #[must_use]
    pub const fn stream_label(&self) -> &'a str {
        self.stream_label
    }
}

impl fmt::Display for StreamArn<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{SCHEME}:{}:{SERVICE}:{}:{}:{TABLE_PREFIX}{}{STREAM_SEPARATOR}{}",
            self.partition, self.region, self.account_id, self.table_name, self.stream_label
        )
    }
}

// Partitions and regions: lowercase ASCII, digits and dashes.
fn is_label(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-')
}

fn is_account_id(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

fn is_table_name(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_alphanumeric() || matches!(b, b'_' | b'-' | b'.'))
}

#[cfg(test)]
mod tests {
    use super::*;

    const ARN: &str =
        "arn:aws:dynamodb:us-east-1:921281748045:table/qna_production_questions/stream/2017-12-22T02:02:25.496";

    #[test]
    fn test_extracts_all_parts() {
        let arn = StreamArn::parse(ARN).unwrap();
        assert_eq!(arn.partition(), "aws");
        assert_eq!(arn.region(), "us-east-1");
        assert_eq!(arn.account_id(), "921281748045");
        assert_eq!(arn.table_name(), "qna_production_questions");
        assert_eq!(arn.stream_label(), "2017-12-22T02:02:25.496");
        assert_eq!(arn.to_string(), ARN);
    }

    #[test]
    fn test_other_partitions_and_dashed_tables() {
        let arn = StreamArn::parse(
            "arn:aws-us-gov:dynamodb:us-gov-west-1:1:table/orders-v2.prod/stream/label",
        )
        .unwrap();
        assert_eq!(arn.partition(), "aws-us-gov");
        assert_eq!(arn.table_name(), "orders-v2.prod");
    }

    #[test]
    fn test_rejects_other_shapes() {
        for raw in [
            "",
            "not an arn",
            "arn:aws:kinesis:us-east-1:1:stream/users",
            "arn:aws:dynamodb:us-east-1:1:table/users",
            "arn:aws:dynamodb:us-east-1:abc:table/users/stream/x",
            "arn:aws:dynamodb:US-EAST-1:1:table/users/stream/x",
            "arn:aws:dynamodb:us-east-1:1:table//stream/x",
            "arn:aws:dynamodb:us-east-1:1:table/users/stream/",
            "arn:aws:dynamodb:us-east-1:1:table/us ers/stream/x",
            "arn:aws:dynamodb:us-east-1:1:table/users/stream/x y",
            "arn:aws:dynamodb:us-east-1:1:index/users/stream/x",
        ] {
            assert!(StreamArn::parse(raw).is_none(), "{raw:?} should not parse");
        }
    }
}
