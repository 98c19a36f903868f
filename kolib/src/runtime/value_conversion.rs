//! Value conversion utilities for keyword values ↔ JSON
//!
//! Engines that marshal keyword arguments as JSON (remote library servers,
//! recorded fixtures) go through these two functions.

use crate::runtime::error::{KeywordError, KeywordResult};
use crate::runtime::values::Value;
use bigdecimal::BigDecimal;
use indexmap::IndexMap;
use num_bigint::BigInt;
use num_traits::ToPrimitive;
use std::str::FromStr;

/// Convert a keyword Value to serde_json::Value
///
/// Temporal, duration and enum values are rendered as their text form. Big
/// numbers that do not fit a JSON number are rendered as strings. Opaque
/// objects cannot be serialized.
pub fn value_to_json(value: &Value) -> KeywordResult<serde_json::Value> {
    match value {
        Value::Nil => Ok(serde_json::Value::Null),
        Value::Bool(b) => Ok(serde_json::Value::Bool(*b)),
        Value::Byte(n) => Ok(serde_json::Value::from(*n)),
        Value::Short(n) => Ok(serde_json::Value::from(*n)),
        Value::Int(n) => Ok(serde_json::Value::from(*n)),
        Value::Long(n) => Ok(serde_json::Value::from(*n)),
        Value::Float(f) => float_to_json(f64::from(*f)),
        Value::Double(f) => float_to_json(*f),
        Value::BigInteger(n) => Ok(n
            .to_i64()
            .map(serde_json::Value::from)
            .unwrap_or_else(|| serde_json::Value::String(n.to_string()))),
        Value::BigDecimal(n) => Ok(serde_json::Value::String(n.to_string())),
        Value::String(s) => Ok(serde_json::Value::String(s.clone())),
        Value::Bytes(bytes) => Ok(serde_json::Value::Array(
            bytes.iter().map(|b| serde_json::Value::from(*b)).collect(),
        )),
        Value::List(items) => {
            let json_array: Result<Vec<serde_json::Value>, KeywordError> =
                items.iter().map(value_to_json).collect();
            Ok(serde_json::Value::Array(json_array?))
        }
        Value::Map(entries) => {
            let mut json_obj = serde_json::Map::new();
            for (key, val) in entries.iter() {
                json_obj.insert(key.clone(), value_to_json(val)?);
            }
            Ok(serde_json::Value::Object(json_obj))
        }
        Value::Temporal(_) | Value::Duration(_) | Value::Enum(_) => {
            Ok(serde_json::Value::String(value.to_string()))
        }
        Value::Object(o) => Err(KeywordError::type_mismatch(
            "JSON-serializable value",
            o.type_name.clone(),
        )),
    }
}

fn float_to_json(f: f64) -> KeywordResult<serde_json::Value> {
    serde_json::Number::from_f64(f)
        .map(serde_json::Value::Number)
        .ok_or_else(|| KeywordError::type_mismatch("finite number", f.to_string()))
}

/// Convert serde_json::Value to a keyword Value
///
/// Integers become `Long`, or `BigInteger` when they exceed 64 bits; other
/// numbers become `Double`. Object key order is kept.
pub fn json_to_value(json: &serde_json::Value) -> Value {
    match json {
        serde_json::Value::Null => Value::Nil,
        serde_json::Value::Bool(b) => Value::Bool(*b),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Long(i)
            } else if let Ok(big) = BigInt::from_str(&n.to_string()) {
                Value::BigInteger(big)
            } else if let Some(f) = n.as_f64() {
                Value::Double(f)
            } else {
                // Fallback: keep the literal when it does not fit a double
                BigDecimal::from_str(&n.to_string())
                    .map(Value::BigDecimal)
                    .unwrap_or_else(|_| Value::String(n.to_string()))
            }
        }
        serde_json::Value::String(s) => Value::String(s.clone()),
        serde_json::Value::Array(arr) => Value::List(arr.iter().map(json_to_value).collect()),
        serde_json::Value::Object(obj) => {
            let map: IndexMap<String, Value> = obj
                .iter()
                .map(|(k, v)| (k.clone(), json_to_value(v)))
                .collect();
            Value::Map(map)
        }
    }
}
