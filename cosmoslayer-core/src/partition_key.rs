//! Partition key values and their header encoding.
//!
//! The service expects the partition key as a JSON array literal with one element
//! per key component, e.g. `["tenant-1"]` or `["tenant-1",42]`. Strings are JSON
//! escaped, while numbers, booleans and `null` are written as JSON literals.
//!
//! # Example
//!
//! ```ignore
//! use cosmoslayer_core::partition_key::PartitionKeyValue;
//!
//! assert_eq!(PartitionKeyValue::from("pk1").encode()?, r#"["pk1"]"#);
//! assert_eq!(PartitionKeyValue::from(("tenant", 7)).encode()?, r#"["tenant",7]"#);
//! ```

use serde_json::{Number, Value};

use crate::error::EncodingError;

/// A value the service can route a document on.
#[derive(Debug, Clone, PartialEq)]
pub enum PartitionKeyValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
    /// A hierarchical key. Each element must itself be a scalar.
    Composite(Vec<PartitionKeyValue>),
}

impl PartitionKeyValue {
    /// Renders the header value for this key.
    ///
    /// # Errors
    ///
    /// Returns [`EncodingError::UnsupportedKeyType`] for empty or nested composite
    /// keys and for non-finite floats.
    pub fn encode(&self) -> Result<String, EncodingError> {
        let components = match self {
            PartitionKeyValue::Composite(items) if items.is_empty() => {
                return Err(EncodingError::UnsupportedKeyType(
                    "composite key without components".into(),
                ));
            }
            PartitionKeyValue::Composite(items) => items
                .iter()
                .map(PartitionKeyValue::component)
                .collect::<Result<Vec<_>, _>>()?,
            scalar => vec![scalar.component()?],
        };

        Ok(escape_for_header(&Value::Array(components).to_string()))
    }

    fn component(&self) -> Result<Value, EncodingError> {
        match self {
            PartitionKeyValue::String(s) => Ok(Value::String(s.clone())),
            PartitionKeyValue::Integer(i) => Ok(Value::from(*i)),
            PartitionKeyValue::Float(f) => Number::from_f64(*f)
                .map(Value::Number)
                .ok_or_else(|| EncodingError::UnsupportedKeyType(format!("non-finite number {f}"))),
            PartitionKeyValue::Bool(b) => Ok(Value::Bool(*b)),
            PartitionKeyValue::Null => Ok(Value::Null),
            PartitionKeyValue::Composite(_) => Err(EncodingError::UnsupportedKeyType(
                "nested composite key".into(),
            )),
        }
    }
}

// Header values must be visible ASCII. JSON already escapes C0 controls; DEL and
// everything above it become `\uXXXX`, which keeps the value valid JSON.
fn escape_for_header(json: &str) -> String {
    let mut escaped = String::with_capacity(json.len());
    for c in json.chars() {
        if c.is_ascii() && c != '\x7f' {
            escaped.push(c);
        } else {
            let mut units = [0u16; 2];
            for unit in c.encode_utf16(&mut units) {
                escaped.push_str(&format!("\\u{unit:04x}"));
            }
        }
    }
    escaped
}

impl From<&str> for PartitionKeyValue {
    fn from(value: &str) -> Self {
        PartitionKeyValue::String(value.to_string())
    }
}

impl From<String> for PartitionKeyValue {
    fn from(value: String) -> Self {
        PartitionKeyValue::String(value)
    }
}

impl From<&String> for PartitionKeyValue {
    fn from(value: &String) -> Self {
        PartitionKeyValue::String(value.clone())
    }
}

impl From<i64> for PartitionKeyValue {
    fn from(value: i64) -> Self {
        PartitionKeyValue::Integer(value)
    }
}

impl From<i32> for PartitionKeyValue {
    fn from(value: i32) -> Self {
        PartitionKeyValue::Integer(value.into())
    }
}

impl From<u32> for PartitionKeyValue {
    fn from(value: u32) -> Self {
        PartitionKeyValue::Integer(value.into())
    }
}

impl From<f64> for PartitionKeyValue {
    fn from(value: f64) -> Self {
        PartitionKeyValue::Float(value)
    }
}

impl From<bool> for PartitionKeyValue {
    fn from(value: bool) -> Self {
        PartitionKeyValue::Bool(value)
    }
}

impl<T: Into<PartitionKeyValue>> From<Option<T>> for PartitionKeyValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(PartitionKeyValue::Null, Into::into)
    }
}

impl<T: Into<PartitionKeyValue>> From<Vec<T>> for PartitionKeyValue {
    fn from(values: Vec<T>) -> Self {
        PartitionKeyValue::Composite(values.into_iter().map(Into::into).collect())
    }
}

impl<A, B> From<(A, B)> for PartitionKeyValue
where
    A: Into<PartitionKeyValue>,
    B: Into<PartitionKeyValue>,
{
    fn from((a, b): (A, B)) -> Self {
        PartitionKeyValue::Composite(vec![a.into(), b.into()])
    }
}

impl<A, B, C> From<(A, B, C)> for PartitionKeyValue
where
    A: Into<PartitionKeyValue>,
    B: Into<PartitionKeyValue>,
    C: Into<PartitionKeyValue>,
{
    fn from((a, b, c): (A, B, C)) -> Self {
        PartitionKeyValue::Composite(vec![a.into(), b.into(), c.into()])
    }
}

impl TryFrom<Value> for PartitionKeyValue {
    type Error = EncodingError;

    /// Converts an arbitrary JSON value, rejecting objects.
    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::String(s) => Ok(PartitionKeyValue::String(s)),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Ok(PartitionKeyValue::Integer(i)),
                None => n
                    .as_f64()
                    .map(PartitionKeyValue::Float)
                    .ok_or_else(|| EncodingError::UnsupportedKeyType(format!("number {n}"))),
            },
            Value::Bool(b) => Ok(PartitionKeyValue::Bool(b)),
            Value::Null => Ok(PartitionKeyValue::Null),
            Value::Array(items) => Ok(PartitionKeyValue::Composite(
                items
                    .into_iter()
                    .map(PartitionKeyValue::try_from)
                    .collect::<Result<Vec<_>, _>>()?,
            )),
            Value::Object(_) => Err(EncodingError::UnsupportedKeyType("object".into())),
        }
    }
}
