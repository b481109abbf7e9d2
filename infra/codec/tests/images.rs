use proptest::prelude::*;
use serde::{Deserialize, Serialize};
use sluice_codec::{AttributeMap, AttributeValue, CodecError, marshal, unmarshal};
use std::collections::BTreeSet;

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct Card {
    id: u64,
    title: String,
    #[serde(rename = "expiresAt")]
    expires_at: Option<i64>,
    tags: BTreeSet<String>,
    avatar: Vec<u8>,
    owner: Owner,
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct Owner {
    name: String,
    verified: bool,
}

fn image(raw: &str) -> AttributeMap {
    serde_json::from_str(raw).expect("fixture image should parse")
}

#[test]
fn unmarshal_reads_every_attribute_kind() {
    let card: Card = unmarshal(&image(
        r#"{
            "id": {"N": "7"},
            "title": {"S": "hello"},
            "expiresAt": {"NULL": true},
            "tags": {"SS": ["b", "a"]},
            "avatar": {"B": "AQID"},
            "owner": {"M": {"name": {"S": "ann"}, "verified": {"BOOL": true}}}
        }"#,
    ))
    .unwrap();

    assert_eq!(card.id, 7);
    assert_eq!(card.title, "hello");
    assert_eq!(card.expires_at, None);
    assert_eq!(card.tags.iter().map(String::as_str).collect::<Vec<_>>(), ["a", "b"]);
    assert_eq!(card.avatar, vec![1, 2, 3]);
    assert_eq!(card.owner, Owner { name: "ann".to_owned(), verified: true });
}

#[test]
fn missing_field_is_a_json_error() {
    let result = unmarshal::<Owner>(&image(r#"{"name": {"S": "ann"}}"#));
    assert!(matches!(result, Err(CodecError::Json { .. })), "got {result:?}");
}

#[test]
fn wrong_attribute_type_is_a_json_error() {
    let result = unmarshal::<Owner>(&image(r#"{"name": {"N": "1"}, "verified": {"BOOL": false}}"#));
    assert!(matches!(result, Err(CodecError::Json { .. })), "got {result:?}");
}

#[test]
fn malformed_number_names_the_attribute() {
    let err = unmarshal::<Owner>(&image(r#"{"name": {"S": "x"}, "score": {"N": "12abc"}}"#))
        .unwrap_err();
    assert!(matches!(err, CodecError::InvalidNumber { .. }));
    assert!(err.to_string().contains("score"), "context should name the attribute: {err}");
}

#[test]
fn marshal_rejects_non_records() {
    let result = marshal(&42_u8);
    assert!(matches!(result, Err(CodecError::NotAnObject { .. })));
}

#[test]
fn marshal_produces_tagged_values() {
    let image = marshal(&Owner { name: "ann".to_owned(), verified: false }).unwrap();
    assert_eq!(image["name"], AttributeValue::S("ann".to_owned()));
    assert_eq!(image["verified"], AttributeValue::Bool(false));
}

proptest! {
    #[test]
    fn integers_survive_the_decimal_text(id in any::<u64>(), delta in any::<i64>()) {
        #[derive(Debug, PartialEq, Serialize, Deserialize)]
        struct Counter { id: u64, delta: i64 }

        let counter = Counter { id, delta };
        let image = marshal(&counter).unwrap();
        prop_assert_eq!(&image["id"], &AttributeValue::N(id.to_string()));
        prop_assert_eq!(unmarshal::<Counter>(&image).unwrap(), counter);
    }
}

#[test]
fn numbers_wider_than_u64_decode_into_u128() {
    #[derive(Debug, Deserialize)]
    struct Ledger {
        total: u128,
    }

    let ledger: Ledger = unmarshal(&image(r#"{"total": {"N": "18446744073709551616"}}"#)).unwrap();
    assert_eq!(ledger.total, u128::from(u64::MAX) + 1);
}

#[test]
fn long_decimals_keep_every_digit() {
    #[derive(Debug, Serialize, Deserialize)]
    struct Balance {
        amount: serde_json::Number,
    }

    const AMOUNT: &str = "12345678901234567890123456789012345678";
    let balance: Balance = unmarshal(&image(&format!(r#"{{"amount": {{"N": "{AMOUNT}"}}}}"#))).unwrap();
    assert_eq!(balance.amount.to_string(), AMOUNT);

    let image = marshal(&balance).unwrap();
    assert_eq!(image["amount"], AttributeValue::N(AMOUNT.to_owned()));
}
