//! Duration conversion.
//!
//! # Rules:
//! - Numeric strings and numbers are seconds; the fraction becomes nanoseconds.
//! - Other strings must be ISO-8601 durations in the `PnDTnHnMn.nS` form.
//! - A map of unit amounts (`weeks`, `days`, `hours`, `minutes`, `seconds`,
//!   `milliseconds`, `microseconds`, `nanoseconds`) is summed, which covers
//!   timedelta-like values handed over by the engine.

use super::number::{bounded, to_big_decimal, to_number};
use super::{ConversionError, ConversionResult};
use crate::runtime::{NumberKind, Value};
use bigdecimal::BigDecimal;
use chrono::TimeDelta;
use indexmap::IndexMap;
use num_traits::ToPrimitive;
use once_cell::sync::Lazy;
use regex::Regex;
use std::str::FromStr;

static ISO_DURATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^([-+]?)P(?:([-+]?\d+)D)?(T(?:([-+]?\d+)H)?(?:([-+]?\d+)M)?(?:([-+]?)(\d+)(?:[.,](\d{0,9}))?S)?)?$",
    )
    .expect("duration pattern is valid")
});

const NANOS_PER_SECOND: i64 = 1_000_000_000;

pub fn to_duration(value: &Value) -> ConversionResult<Value> {
    let delta = match value {
        Value::Duration(d) => Some(*d),
        Value::String(s) => {
            let trimmed = s.trim();
            match BigDecimal::from_str(trimmed) {
                Ok(seconds) => seconds_to_duration(&seconds),
                Err(_) => Some(parse_iso(trimmed).ok_or_else(|| {
                    ConversionError::InvalidIsoDuration { value: s.clone() }
                })?),
            }
        }
        Value::Map(units) => units_to_duration(units),
        other if other.is_number() => to_big_decimal(other).and_then(|s| seconds_to_duration(&s)),
        _ => None,
    };
    delta
        .map(Value::Duration)
        .ok_or_else(|| ConversionError::UnsupportedDuration {
            value: value.to_string(),
            target: "Duration".to_string(),
        })
}

fn seconds_to_duration(seconds: &BigDecimal) -> Option<TimeDelta> {
    let seconds = bounded(seconds)?;
    let integral = seconds.with_scale(0);
    let fraction = (seconds - &integral) * BigDecimal::from(NANOS_PER_SECOND);
    TimeDelta::try_seconds(integral.to_i64()?)?
        .checked_add(&TimeDelta::nanoseconds(fraction.to_i64()?))
}

fn parse_iso(text: &str) -> Option<TimeDelta> {
    let caps = ISO_DURATION.captures(text)?;
    let group = |i: usize| caps.get(i).map(|m| m.as_str());

    // "P" and "PT" alone are not durations
    if group(2).is_none() && group(4).is_none() && group(5).is_none() && group(7).is_none() {
        return None;
    }
    // a time designator needs at least one time component
    if group(3).is_some_and(|t| t.len() == 1) {
        return None;
    }

    let amount = |i: usize| -> Option<i64> { group(i).map_or(Some(0), |v| v.parse().ok()) };
    let mut total = TimeDelta::try_days(amount(2)?)?
        .checked_add(&TimeDelta::try_hours(amount(4)?)?)?
        .checked_add(&TimeDelta::try_minutes(amount(5)?)?)?;

    if let Some(seconds) = group(7) {
        let negative = group(6) == Some("-");
        let nanos: i64 = match group(8) {
            Some(fraction) if !fraction.is_empty() => format!("{:0<9}", fraction).parse().ok()?,
            _ => 0,
        };
        let mut secs = TimeDelta::try_seconds(seconds.parse().ok()?)?
            .checked_add(&TimeDelta::nanoseconds(nanos))?;
        if negative {
            secs = -secs;
        }
        total = total.checked_add(&secs)?;
    }

    if group(1) == Some("-") {
        total = -total;
    }
    Some(total)
}

fn units_to_duration(units: &IndexMap<String, Value>) -> Option<TimeDelta> {
    if units.is_empty() {
        return None;
    }
    let mut total = TimeDelta::zero();
    for (unit, amount) in units {
        let amount = match to_number(amount, NumberKind::I64).ok()? {
            Value::Long(n) => n,
            _ => return None,
        };
        let part = match unit.as_str() {
            "weeks" => TimeDelta::try_weeks(amount)?,
            "days" => TimeDelta::try_days(amount)?,
            "hours" => TimeDelta::try_hours(amount)?,
            "minutes" => TimeDelta::try_minutes(amount)?,
            "seconds" => TimeDelta::try_seconds(amount)?,
            "milliseconds" => TimeDelta::try_milliseconds(amount)?,
            "microseconds" => TimeDelta::microseconds(amount),
            "nanoseconds" => TimeDelta::nanoseconds(amount),
            _ => return None,
        };
        total = total.checked_add(&part)?;
    }
    Some(total)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secs(s: i64, nanos: i64) -> Value {
        Value::Duration(TimeDelta::try_seconds(s).unwrap() + TimeDelta::nanoseconds(nanos))
    }

    #[test]
    fn numeric_strings_are_seconds() {
        assert_eq!(to_duration(&Value::from("90")), Ok(secs(90, 0)));
        assert_eq!(to_duration(&Value::from("1.5")), Ok(secs(1, 500_000_000)));
    }

    #[test]
    fn numbers_are_seconds() {
        assert_eq!(to_duration(&Value::Int(3)), Ok(secs(3, 0)));
        assert_eq!(to_duration(&Value::Double(0.25)), Ok(secs(0, 250_000_000)));
        assert_eq!(to_duration(&Value::Double(-1.5)), Ok(secs(-1, -500_000_000)));
    }

    #[test]
    fn out_of_range_seconds_fail_fast() {
        for raw in ["1e7000000", "1e-7000000", "1e20"] {
            let err = to_duration(&Value::from(raw)).unwrap_err();
            assert_eq!(
                err,
                ConversionError::UnsupportedDuration {
                    value: raw.to_string(),
                    target: "Duration".to_string()
                }
            );
        }
        assert_eq!(to_duration(&Value::from("1.5e2")), Ok(secs(150, 0)));
    }

    #[test]
    fn iso_strings_are_parsed() {
        assert_eq!(to_duration(&Value::from("PT15M")), Ok(secs(900, 0)));
        assert_eq!(
            to_duration(&Value::from("P1DT2H3.25S")),
            Ok(secs(86_400 + 7_200 + 3, 250_000_000))
        );
        assert_eq!(to_duration(&Value::from("-PT6H")), Ok(secs(-21_600, 0)));
    }

    #[test]
    fn malformed_iso_strings_fail() {
        assert!(to_duration(&Value::from("PT")).is_err());
        assert!(to_duration(&Value::from("ten minutes")).is_err());
    }

    #[test]
    fn unit_maps_are_summed() {
        let mut units = IndexMap::new();
        units.insert("days".to_string(), Value::Int(1));
        units.insert("seconds".to_string(), Value::Int(30));
        units.insert("microseconds".to_string(), Value::from("5"));
        assert_eq!(to_duration(&Value::Map(units)), Ok(secs(86_430, 5_000)));
    }

    #[test]
    fn unsupported_values_name_target() {
        let err = to_duration(&Value::Bool(true)).unwrap_err();
        assert_eq!(err.to_string(), "No conversion strategy of true to Duration");
    }
}
