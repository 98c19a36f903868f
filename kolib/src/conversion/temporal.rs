//! Temporal conversion.
//!
//! Text is parsed with one flexible pattern:
//! `[yyyy-MM-dd][T| ][HH:mm[:ss[.fffffffff]]][zone]` where the zone is `Z`, `UTC`,
//! `GMT` or a numeric offset (`+02`, `+0200`, `+02:00`). Missing date fields
//! default to 1900-01-01, missing time fields to zero.
//!
//! Local targets take the wall-clock fields as written. Targets that need an
//! instant use the written offset, or the local system zone when none is given.

use super::{ConversionError, ConversionResult};
use crate::runtime::{Temporal, TemporalKind, Value};
use chrono::{
    DateTime, FixedOffset, Local, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, Offset,
    TimeDelta, TimeZone, Utc,
};
use once_cell::sync::Lazy;
use regex::Regex;

static TEMPORAL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?:(\d{4})-(\d{2})-(\d{2}))?(?:T| )?(?:(\d{2}):(\d{2})(?::(\d{2})(?:\.(\d{1,9}))?)?)?\s*(Z|UTC|GMT|[+-]\d{2}(?::?\d{2})?)?$",
    )
    .expect("temporal pattern is valid")
});

const DEFAULT_YEAR: i32 = 1900;

/// Wall-clock fields plus the offset they were written in, if any.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Parsed {
    local: NaiveDateTime,
    offset: Option<FixedOffset>,
}

pub fn to_temporal(value: &Value, target: TemporalKind) -> ConversionResult<Value> {
    let parsed = match value {
        Value::String(s) => parse(s.trim()).ok_or_else(|| ConversionError::UnparseableTemporal {
            value: s.clone(),
            target: target.simple_name().to_string(),
        })?,
        Value::Temporal(t) => from_temporal(t).ok_or_else(|| unsupported(value, target))?,
        other => return Err(unsupported(other, target)),
    };
    project(parsed, target)
        .map(Value::Temporal)
        .ok_or_else(|| unsupported(value, target))
}

fn unsupported(value: &Value, target: TemporalKind) -> ConversionError {
    ConversionError::UnsupportedTemporal {
        value: value.to_string(),
        actual: value.type_name().to_string(),
        target: target.simple_name().to_string(),
    }
}

fn parse(text: &str) -> Option<Parsed> {
    let caps = TEMPORAL_PATTERN.captures(text)?;
    let field = |i: usize| caps.get(i).map(|m| m.as_str());
    if field(1).is_none() && field(4).is_none() {
        return None;
    }

    let date = match (field(1), field(2), field(3)) {
        (Some(y), Some(m), Some(d)) => {
            NaiveDate::from_ymd_opt(y.parse().ok()?, m.parse().ok()?, d.parse().ok()?)?
        }
        _ => NaiveDate::from_ymd_opt(DEFAULT_YEAR, 1, 1)?,
    };

    let hour: u32 = field(4).map_or(Some(0), |h| h.parse().ok())?;
    let minute: u32 = field(5).map_or(Some(0), |m| m.parse().ok())?;
    let second: u32 = field(6).map_or(Some(0), |s| s.parse().ok())?;
    let nanos: u32 = match field(7) {
        // right-pad the fraction to nine digits
        Some(fraction) => format!("{:0<9}", fraction).parse().ok()?,
        None => 0,
    };
    let time = NaiveTime::from_hms_nano_opt(hour, minute, second, nanos)?;

    let offset = match field(8) {
        Some(zone) => Some(parse_offset(zone)?),
        None => None,
    };

    Some(Parsed {
        local: date.and_time(time),
        offset,
    })
}

fn parse_offset(zone: &str) -> Option<FixedOffset> {
    if matches!(zone, "Z" | "UTC" | "GMT") {
        return FixedOffset::east_opt(0);
    }
    let sign = if zone.starts_with('-') { -1 } else { 1 };
    let digits: String = zone[1..].chars().filter(|c| c.is_ascii_digit()).collect();
    let hours: i32 = digits.get(0..2)?.parse().ok()?;
    let minutes: i32 = match digits.get(2..4) {
        Some(m) => m.parse().ok()?,
        None => 0,
    };
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

/// Already-temporal inputs that carry a date, so they can be projected.
fn from_temporal(temporal: &Temporal) -> Option<Parsed> {
    let parsed = match temporal {
        Temporal::Timestamp(ts) => Parsed {
            local: ts.naive_utc(),
            offset: Some(Utc.fix()),
        },
        Temporal::ZonedDateTime(dt) | Temporal::OffsetDateTime(dt) => Parsed {
            local: dt.naive_local(),
            offset: Some(*dt.offset()),
        },
        Temporal::LocalDateTime(dt) => Parsed {
            local: *dt,
            offset: None,
        },
        Temporal::LocalDate(d) => Parsed {
            local: d.and_time(NaiveTime::MIN),
            offset: None,
        },
        Temporal::LocalTime(_) | Temporal::OffsetTime(_, _) => return None,
    };
    Some(parsed)
}

fn resolve(parsed: Parsed) -> Option<DateTime<FixedOffset>> {
    match parsed.offset {
        Some(offset) => offset.from_local_datetime(&parsed.local).single(),
        None => in_zone(&Local, &parsed.local),
    }
}

/// Places wall-clock fields in `zone`. An overlap takes the earlier offset; a
/// time skipped by a forward transition is read with the offset in force before
/// it, which lands the same distance past the gap.
fn in_zone<Tz: TimeZone>(zone: &Tz, local: &NaiveDateTime) -> Option<DateTime<FixedOffset>> {
    match zone.from_local_datetime(local) {
        LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => Some(dt.fixed_offset()),
        LocalResult::None => {
            let day_before = local.checked_sub_signed(TimeDelta::try_days(1)?)?;
            let before = zone.offset_from_utc_datetime(&day_before).fix();
            let instant = before.from_local_datetime(local).single()?;
            Some(instant.with_timezone(zone).fixed_offset())
        }
    }
}

fn project(parsed: Parsed, target: TemporalKind) -> Option<Temporal> {
    let temporal = match target {
        TemporalKind::LocalDate => Temporal::LocalDate(parsed.local.date()),
        TemporalKind::LocalTime => Temporal::LocalTime(parsed.local.time()),
        TemporalKind::LocalDateTime => Temporal::LocalDateTime(parsed.local),
        TemporalKind::ZonedDateTime => Temporal::ZonedDateTime(resolve(parsed)?),
        TemporalKind::OffsetDateTime => Temporal::OffsetDateTime(resolve(parsed)?),
        TemporalKind::OffsetTime => {
            let dt = resolve(parsed)?;
            Temporal::OffsetTime(dt.time(), *dt.offset())
        }
        TemporalKind::Timestamp => Temporal::Timestamp(resolve(parsed)?.with_timezone(&Utc)),
    };
    Some(temporal)
}
