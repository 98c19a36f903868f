//! Type conversion strategies
//!
//! Each strategy takes an arbitrary [`Value`](crate::runtime::Value) and a target
//! shape and either produces a value of that shape or a [`ConversionError`]
//! naming the offending value and the target.

pub mod boolean;
pub mod duration;
pub mod enumeration;
pub mod number;
pub mod temporal;

pub use boolean::to_boolean;
pub use duration::to_duration;
pub use enumeration::to_enum;
pub use number::to_number;
pub use temporal::to_temporal;

use itertools::Itertools;
use thiserror::Error;

pub type ConversionResult<T> = Result<T, ConversionError>;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConversionError {
    #[error("Unable to convert String {value} to Boolean! Valid values for `true` are [{}], and for `false` are [{}].", quoted(&boolean::TRUES), quoted(&boolean::FALSES))]
    InvalidBooleanLiteral { value: String },

    #[error("Unexpected type for value {value}! Only Numbers and some Strings are allowed.")]
    UnexpectedBooleanSource { value: String },

    #[error("Unable to parse '{value}' as {target}")]
    InvalidNumber { value: String, target: String },

    #[error("No converter defined to convert '{value}' to type {target}")]
    NoNumberConverter { value: String, target: String },

    #[error("Unable to cast value '{value}' to enum '{target}'! Valid values are: [{}].", .valid.join(", "))]
    UnknownEnumConstant {
        value: String,
        target: String,
        valid: Vec<String>,
    },

    #[error("Unable to cast value '{value}' to enum '{target}' because multiple candidates found!\nPlease specify enum exact or consider renaming your enums. Valid values are: [{}].", .valid.join(", "))]
    AmbiguousEnumConstant {
        value: String,
        target: String,
        valid: Vec<String>,
    },

    #[error("Could not find a matching temporal converter for `{value}` to `{target}`")]
    UnparseableTemporal { value: String, target: String },

    #[error("No temporal converter defined to convert {value} of type {actual} to {target}")]
    UnsupportedTemporal {
        value: String,
        actual: String,
        target: String,
    },

    #[error("No conversion strategy of {value} to {target}")]
    UnsupportedDuration { value: String, target: String },

    #[error("Unable to parse '{value}' as ISO-8601 duration")]
    InvalidIsoDuration { value: String },

    #[error("Constructor of {target} rejected value {value}: {message}")]
    ConstructorFailed {
        value: String,
        target: String,
        message: String,
    },

    #[error("Unable to convert value {value} of type {actual} to {target}")]
    Unconvertible {
        value: String,
        actual: String,
        target: String,
    },
}

fn quoted(literals: &[&str]) -> String {
    literals.iter().map(|l| format!("'{}'", l)).join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boolean_message_lists_literals() {
        let err = ConversionError::InvalidBooleanLiteral {
            value: "maybe".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Unable to convert String maybe to Boolean! Valid values for `true` are ['yes', 'true', 'on', 'ok'], and for `false` are ['', 'no', 'false', 'off', 'nok']."
        );
    }
}
