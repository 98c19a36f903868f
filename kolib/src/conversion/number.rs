//! Numeric conversion.
//!
//! Strings are parsed by the target width. Numbers of another width are narrowed
//! or widened with truncation, the way a primitive cast would do it.

use super::{ConversionError, ConversionResult};
use crate::runtime::{NumberKind, Value};
use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use num_traits::{FromPrimitive, ToPrimitive};
use std::str::FromStr;

pub fn to_number(value: &Value, target: NumberKind) -> ConversionResult<Value> {
    match value {
        Value::String(s) => parse_number(s.trim(), target).ok_or_else(|| {
            ConversionError::InvalidNumber {
                value: s.clone(),
                target: target.simple_name().to_string(),
            }
        }),
        other if other.is_number() => cast_number(other, target).ok_or_else(|| {
            ConversionError::InvalidNumber {
                value: other.to_string(),
                target: target.simple_name().to_string(),
            }
        }),
        other => Err(ConversionError::NoNumberConverter {
            value: other.to_string(),
            target: target.simple_name().to_string(),
        }),
    }
}

fn parse_number(s: &str, target: NumberKind) -> Option<Value> {
    let value = match target {
        NumberKind::I8 => Value::Byte(s.parse().ok()?),
        NumberKind::I16 => Value::Short(s.parse().ok()?),
        NumberKind::I32 => Value::Int(s.parse().ok()?),
        NumberKind::I64 => Value::Long(s.parse().ok()?),
        NumberKind::F32 => Value::Float(s.parse().ok()?),
        NumberKind::F64 => Value::Double(s.parse().ok()?),
        NumberKind::BigInteger => Value::BigInteger(BigInt::from_str(s).ok()?),
        NumberKind::BigDecimal => Value::BigDecimal(BigDecimal::from_str(s).ok()?),
    };
    Some(value)
}

/// Decimal exponents beyond this magnitude are rejected before any rescaling,
/// which would otherwise expand `1e7000000` digit by digit.
const MAX_DECIMAL_EXPONENT: i64 = 1_000;

/// `decimal` when its exponent is small enough to rescale cheaply.
pub(crate) fn bounded(decimal: &BigDecimal) -> Option<&BigDecimal> {
    let (_, scale) = decimal.as_bigint_and_exponent();
    (scale.abs() <= MAX_DECIMAL_EXPONENT).then_some(decimal)
}

/// Intermediate representation every numeric value widens into before narrowing.
enum Wide {
    Integral(i64),
    Floating(f64),
    Big(BigInt),
    Decimal(BigDecimal),
}

fn widen(value: &Value) -> Option<Wide> {
    let wide = match value {
        Value::Byte(n) => Wide::Integral(i64::from(*n)),
        Value::Short(n) => Wide::Integral(i64::from(*n)),
        Value::Int(n) => Wide::Integral(i64::from(*n)),
        Value::Long(n) => Wide::Integral(*n),
        Value::Float(n) => Wide::Floating(f64::from(*n)),
        Value::Double(n) => Wide::Floating(*n),
        Value::BigInteger(n) => Wide::Big(n.clone()),
        Value::BigDecimal(n) => Wide::Decimal(n.clone()),
        _ => return None,
    };
    Some(wide)
}

fn cast_number(value: &Value, target: NumberKind) -> Option<Value> {
    let wide = widen(value)?;
    if target.is_integral() {
        let n = match wide {
            Wide::Integral(n) => n,
            Wide::Floating(f) => f as i64,
            Wide::Big(b) => b.to_i64()?,
            Wide::Decimal(d) => bounded(&d)?.to_i64()?,
        };
        return Some(match target {
            NumberKind::I8 => Value::Byte(n as i8),
            NumberKind::I16 => Value::Short(n as i16),
            NumberKind::I32 => Value::Int(n as i32),
            _ => Value::Long(n),
        });
    }
    if target.is_floating() {
        let f = match wide {
            Wide::Integral(n) => n as f64,
            Wide::Floating(f) => f,
            Wide::Big(b) => b.to_f64()?,
            Wide::Decimal(d) => bounded(&d)?.to_f64()?,
        };
        return Some(match target {
            NumberKind::F32 => Value::Float(f as f32),
            _ => Value::Double(f),
        });
    }
    match target {
        NumberKind::BigInteger => {
            let big = match wide {
                Wide::Integral(n) => BigInt::from(n),
                Wide::Floating(f) => BigInt::from_f64(f.trunc())?,
                Wide::Big(b) => b,
                Wide::Decimal(d) => bounded(&d)?.with_scale(0).as_bigint_and_exponent().0,
            };
            Some(Value::BigInteger(big))
        }
        _ => {
            let decimal = match wide {
                Wide::Integral(n) => BigDecimal::from(n),
                Wide::Floating(f) => BigDecimal::from_str(&f.to_string()).ok()?,
                Wide::Big(b) => BigDecimal::new(b, 0),
                Wide::Decimal(d) => d,
            };
            Some(Value::BigDecimal(decimal))
        }
    }
}

/// Any numeric value as an arbitrary-precision decimal.
pub fn to_big_decimal(value: &Value) -> Option<BigDecimal> {
    match cast_number(value, NumberKind::BigDecimal)? {
        Value::BigDecimal(d) => Some(d),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_strings_by_width() {
        assert_eq!(to_number(&Value::from("42"), NumberKind::I32), Ok(Value::Int(42)));
        assert_eq!(to_number(&Value::from(" -7 "), NumberKind::I8), Ok(Value::Byte(-7)));
        assert_eq!(to_number(&Value::from("1.5"), NumberKind::F64), Ok(Value::Double(1.5)));
        assert_eq!(
            to_number(&Value::from("123456789012345678901234567890"), NumberKind::BigInteger),
            Ok(Value::BigInteger(
                BigInt::from_str("123456789012345678901234567890").unwrap()
            ))
        );
    }

    #[test]
    fn out_of_range_string_fails() {
        let err = to_number(&Value::from("300"), NumberKind::I8).unwrap_err();
        assert_eq!(
            err,
            ConversionError::InvalidNumber {
                value: "300".to_string(),
                target: "Byte".to_string()
            }
        );
    }

    #[test]
    fn casts_between_widths() {
        assert_eq!(to_number(&Value::Int(7), NumberKind::I64), Ok(Value::Long(7)));
        assert_eq!(to_number(&Value::Double(3.9), NumberKind::I32), Ok(Value::Int(3)));
        assert_eq!(to_number(&Value::Int(2), NumberKind::F32), Ok(Value::Float(2.0)));
        assert_eq!(
            to_number(&Value::Double(2.5), NumberKind::BigDecimal),
            Ok(Value::BigDecimal(BigDecimal::from_str("2.5").unwrap()))
        );
    }

    #[test]
    fn huge_exponents_are_rejected_without_expansion() {
        let huge = Value::BigDecimal(BigDecimal::from_str("1e7000000").unwrap());
        for target in [NumberKind::I64, NumberKind::F64, NumberKind::BigInteger] {
            let err = to_number(&huge, target).unwrap_err();
            assert!(matches!(err, ConversionError::InvalidNumber { .. }));
        }
        let tiny = Value::BigDecimal(BigDecimal::from_str("1e-7000000").unwrap());
        assert!(to_number(&tiny, NumberKind::I32).is_err());
        let thousand = Value::BigDecimal(BigDecimal::from_str("1e3").unwrap());
        assert_eq!(to_number(&thousand, NumberKind::I32), Ok(Value::Int(1000)));
        assert_eq!(to_number(&huge, NumberKind::BigDecimal), Ok(huge.clone()));
    }

    #[test]
    fn non_numbers_have_no_converter() {
        let err = to_number(&Value::Bool(true), NumberKind::I32).unwrap_err();
        assert!(matches!(err, ConversionError::NoNumberConverter { .. }));
    }
}
