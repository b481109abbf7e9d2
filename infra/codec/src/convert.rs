use crate::error::{CodecError, CodecErrorExt};
use crate::value::{AttributeMap, AttributeValue};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Number, Value};

/// Decodes an image into a typed record.
///
/// Numbers keep their exact decimal text until the target field reads them,
/// binary attributes become byte arrays and string/number/binary sets become
/// plain sequences.
///
/// # Errors
/// Returns [`CodecError::InvalidNumber`] for malformed numeric attributes and
/// [`CodecError::Json`] when the image does not fit `T` (missing field, wrong
/// attribute type).
pub fn unmarshal<T: DeserializeOwned>(image: &AttributeMap) -> Result<T, CodecError> {
    let document = image_to_json(image)?;
    serde_json::from_value(Value::Object(document))
        .context(format!("Decoding {}", std::any::type_name::<T>()))
}

/// Encodes a typed record into an image.
///
/// # Errors
/// Returns [`CodecError::NotAnObject`] when `T` does not serialize to a map,
/// or [`CodecError::Json`] when serialization itself fails.
pub fn marshal<T: Serialize>(record: &T) -> Result<AttributeMap, CodecError> {
    match serde_json::to_value(record)? {
        Value::Object(fields) => Ok(fields.into_iter().map(|(k, v)| (k, from_json(v))).collect()),
        other => Err(CodecError::NotAnObject {
            message: format!("{} serialized to {}", std::any::type_name::<T>(), json_kind(&other))
                .into(),
            context: None,
        }),
    }
}

fn image_to_json(image: &AttributeMap) -> Result<Map<String, Value>, CodecError> {
    image
        .iter()
        .map(|(name, value)| {
            to_json(value).context(format!("Attribute '{name}'")).map(|v| (name.clone(), v))
        })
        .collect()
}

fn to_json(value: &AttributeValue) -> Result<Value, CodecError> {
    Ok(match value {
        AttributeValue::S(s) => Value::String(s.clone()),
        AttributeValue::N(n) => Value::Number(parse_number(n)?),
        AttributeValue::B(bytes) => bytes_to_json(bytes),
        AttributeValue::Bool(b) => Value::Bool(*b),
        AttributeValue::Null(_) => Value::Null,
        AttributeValue::M(map) => Value::Object(image_to_json(map)?),
        AttributeValue::L(items) => Value::Array(items.iter().map(to_json).collect::<Result<_, _>>()?),
        AttributeValue::Ss(items) => Value::Array(items.iter().cloned().map(Value::String).collect()),
        AttributeValue::Ns(items) => Value::Array(
            items.iter().map(|n| parse_number(n).map(Value::Number)).collect::<Result<_, _>>()?,
        ),
        AttributeValue::Bs(items) => Value::Array(items.iter().map(|b| bytes_to_json(b)).collect()),
    })
}

fn from_json(value: Value) -> AttributeValue {
    match value {
        Value::Null => AttributeValue::Null(true),
        Value::Bool(b) => AttributeValue::Bool(b),
        Value::Number(n) => AttributeValue::N(n.to_string()),
        Value::String(s) => AttributeValue::S(s),
        Value::Array(items) => AttributeValue::L(items.into_iter().map(from_json).collect()),
        Value::Object(fields) => {
            AttributeValue::M(fields.into_iter().map(|(k, v)| (k, from_json(v))).collect())
        },
    }
}

fn parse_number(raw: &str) -> Result<Number, CodecError> {
    raw.trim().parse::<Number>().map_err(|e| CodecError::InvalidNumber {
        message: format!("'{raw}': {e}").into(),
        context: None,
    })
}

fn bytes_to_json(bytes: &[u8]) -> Value {
    Value::Array(bytes.iter().map(|b| Value::from(*b)).collect())
}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
