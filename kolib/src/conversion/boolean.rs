//! Boolean conversion.
//!
//! # Rules:
//! - Numbers convert by a nonzero check.
//! - Strings are trimmed. A numeric string follows the number rule, otherwise the
//!   string is matched case-insensitively against [`TRUES`] and [`FALSES`].
//! - Every other type is rejected.

use super::{ConversionError, ConversionResult};
use crate::runtime::Value;
use bigdecimal::BigDecimal;
use num_traits::Zero;
use std::str::FromStr;

pub const TRUES: [&str; 4] = ["yes", "true", "on", "ok"];
pub const FALSES: [&str; 5] = ["", "no", "false", "off", "nok"];

pub fn to_boolean(value: &Value) -> ConversionResult<bool> {
    match value {
        Value::Bool(b) => Ok(*b),
        Value::String(s) => string_to_boolean(s),
        other => number_to_boolean(other).ok_or_else(|| ConversionError::UnexpectedBooleanSource {
            value: other.to_string(),
        }),
    }
}

fn string_to_boolean(raw: &str) -> ConversionResult<bool> {
    let trimmed = raw.trim();
    if let Ok(number) = BigDecimal::from_str(trimmed) {
        return Ok(!number.is_zero());
    }
    let lower = trimmed.to_lowercase();
    if TRUES.contains(&lower.as_str()) {
        Ok(true)
    } else if FALSES.contains(&lower.as_str()) {
        Ok(false)
    } else {
        Err(ConversionError::InvalidBooleanLiteral {
            value: raw.to_string(),
        })
    }
}

fn number_to_boolean(value: &Value) -> Option<bool> {
    let nonzero = match value {
        Value::Byte(n) => *n != 0,
        Value::Short(n) => *n != 0,
        Value::Int(n) => *n != 0,
        Value::Long(n) => *n != 0,
        Value::Float(n) => *n != 0.0,
        Value::Double(n) => *n != 0.0,
        Value::BigInteger(n) => !n.is_zero(),
        Value::BigDecimal(n) => !n.is_zero(),
        _ => return None,
    };
    Some(nonzero)
}
