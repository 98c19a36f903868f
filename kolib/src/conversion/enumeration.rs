//! Enumeration conversion.
//!
//! # Rules:
//! - A constant is a candidate when its name equals the text case-insensitively,
//!   or when both are equal case-insensitively after replacing spaces with underscores.
//! - No candidate fails, listing all constants.
//! - Several candidates are narrowed to the exact case-insensitive matches. If more
//!   than one remains, they are narrowed to the byte-exact match. Narrowing to
//!   nothing fails as ambiguous.

use super::{ConversionError, ConversionResult};
use crate::runtime::{EnumType, EnumValue, Value};

pub fn to_enum(value: &Value, target: &EnumType) -> ConversionResult<Value> {
    let text = value.to_string();
    let lower = text.to_lowercase();
    let normalized = lower.replace(' ', "_");

    let mut candidates: Vec<&String> = target
        .constants
        .iter()
        .filter(|c| {
            let c_lower = c.to_lowercase();
            c_lower == lower || c_lower.replace(' ', "_") == normalized
        })
        .collect();

    if candidates.is_empty() {
        return Err(ConversionError::UnknownEnumConstant {
            value: text,
            target: target.name.clone(),
            valid: target.constants.clone(),
        });
    }

    if candidates.len() > 1 {
        candidates.retain(|c| c.to_lowercase() == lower);
        if candidates.len() > 1 {
            candidates.retain(|c| c.as_str() == text);
        }
        if candidates.is_empty() {
            return Err(ConversionError::AmbiguousEnumConstant {
                value: text,
                target: target.name.clone(),
                valid: target.constants.clone(),
            });
        }
    }

    Ok(Value::Enum(EnumValue::new(&target.name, candidates[0].as_str())))
}
