//! Value adapters between domain values and the codec's string interface
//!
//! Each sensitive field carries one of three value shapes: a single finite
//! number, a map of string keys to numbers (e.g. per-month amounts keyed by
//! "YYYY-MM"), or a map of string keys to free text. The adapter turns the
//! value into the plaintext string the codec encrypts and parses the codec's
//! output back into the original shape.

use std::collections::BTreeMap;

use serde_json::{Map, Number, Value};

use crate::error::{ShieldError, ShieldResult};

/// Which serialization applies to a sensitive field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdapterKind {
    /// A single finite number
    Numeric,
    /// A mapping of string keys to finite numbers
    NumericMap,
    /// A mapping of string keys to free text; values are not validated
    TextMap,
}

impl AdapterKind {
    /// Serialize a domain value into the plaintext string to encrypt
    ///
    /// Fails with [`ShieldError::ValueFormat`] when the value does not match
    /// this adapter's shape; encrypt-path callers propagate that failure
    /// rather than persist a silently wrong value.
    pub(crate) fn serialize(&self, value: &Value) -> ShieldResult<String> {
        match self {
            Self::Numeric => match value {
                Value::Number(n) => Ok(n.to_string()),
                other => Err(ShieldError::ValueFormat(format!(
                    "expected a number, got {}",
                    json_type_name(other)
                ))),
            },
            Self::NumericMap => {
                let entries = as_map_entries(value)?;
                // Sorted keys keep the plaintext canonical
                let mut sorted: BTreeMap<&String, &Number> = BTreeMap::new();
                for (key, entry) in entries {
                    match entry {
                        Value::Number(n) => {
                            sorted.insert(key, n);
                        }
                        other => {
                            return Err(ShieldError::ValueFormat(format!(
                                "map contains a non-numeric value ({})",
                                json_type_name(other)
                            )));
                        }
                    }
                }
                serde_json::to_string(&sorted)
                    .map_err(|_| ShieldError::ValueFormat("map is not serializable".into()))
            }
            Self::TextMap => {
                let entries = as_map_entries(value)?;
                let sorted: BTreeMap<&String, &Value> = entries.iter().collect();
                serde_json::to_string(&sorted)
                    .map_err(|_| ShieldError::ValueFormat("map is not serializable".into()))
            }
        }
    }

    /// Parse decrypted plaintext back into the original value shape
    pub(crate) fn deserialize(&self, plaintext: &str) -> ShieldResult<Value> {
        match self {
            Self::Numeric => {
                let number: Number = serde_json::from_str(plaintext).map_err(|_| {
                    ShieldError::ValueFormat("plaintext is not a finite number".into())
                })?;
                Ok(Value::Number(number))
            }
            Self::NumericMap => {
                let map: BTreeMap<String, Number> =
                    serde_json::from_str(plaintext).map_err(|_| {
                        ShieldError::ValueFormat(
                            "plaintext is not a map of numeric values".into(),
                        )
                    })?;
                Ok(Value::Object(Map::from_iter(
                    map.into_iter().map(|(k, n)| (k, Value::Number(n))),
                )))
            }
            Self::TextMap => {
                let map: BTreeMap<String, Value> =
                    serde_json::from_str(plaintext).map_err(|_| {
                        ShieldError::ValueFormat("plaintext is not a map".into())
                    })?;
                Ok(Value::Object(Map::from_iter(map)))
            }
        }
    }

    /// Safe default substituted when a field cannot be recovered
    pub(crate) fn default_value(&self) -> Value {
        match self {
            Self::Numeric => Value::Number(Number::from(0)),
            Self::NumericMap | Self::TextMap => Value::Object(Map::new()),
        }
    }
}

fn as_map_entries(value: &Value) -> ShieldResult<&Map<String, Value>> {
    match value {
        Value::Object(entries) => Ok(entries),
        other => Err(ShieldError::ValueFormat(format!(
            "expected a map, got {}",
            json_type_name(other)
        ))),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "map",
    }
}
