// Runtime value system for keyword calls
// Represents the arguments handed over by the engine and the results handed back

use crate::runtime::error::{KeywordError, KeywordResult};
use crate::runtime::types::{NumberKind, TemporalKind};
use bigdecimal::BigDecimal;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Utc};
use indexmap::IndexMap;
use itertools::Itertools;
use num_bigint::BigInt;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Nil,
    Bool(bool),
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    BigInteger(BigInt),
    BigDecimal(BigDecimal),
    String(String),
    Bytes(Vec<u8>),
    List(Vec<Value>),
    Map(IndexMap<String, Value>),
    Temporal(Temporal),
    Duration(TimeDelta),
    Enum(EnumValue),
    Object(ObjectValue),
}

/// Date and time values in the shapes a keyword may declare.
#[derive(Debug, Clone, PartialEq)]
pub enum Temporal {
    LocalDate(NaiveDate),
    LocalTime(NaiveTime),
    LocalDateTime(NaiveDateTime),
    ZonedDateTime(DateTime<FixedOffset>),
    OffsetDateTime(DateTime<FixedOffset>),
    OffsetTime(NaiveTime, FixedOffset),
    Timestamp(DateTime<Utc>),
}

impl Temporal {
    pub fn kind(&self) -> TemporalKind {
        match self {
            Temporal::LocalDate(_) => TemporalKind::LocalDate,
            Temporal::LocalTime(_) => TemporalKind::LocalTime,
            Temporal::LocalDateTime(_) => TemporalKind::LocalDateTime,
            Temporal::ZonedDateTime(_) => TemporalKind::ZonedDateTime,
            Temporal::OffsetDateTime(_) => TemporalKind::OffsetDateTime,
            Temporal::OffsetTime(_, _) => TemporalKind::OffsetTime,
            Temporal::Timestamp(_) => TemporalKind::Timestamp,
        }
    }
}

impl fmt::Display for Temporal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Temporal::LocalDate(d) => write!(f, "{}", d),
            Temporal::LocalTime(t) => write!(f, "{}", t),
            Temporal::LocalDateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%dT%H:%M:%S%.f")),
            Temporal::ZonedDateTime(dt) | Temporal::OffsetDateTime(dt) => {
                write!(f, "{}", dt.to_rfc3339())
            }
            Temporal::OffsetTime(t, offset) => write!(f, "{}{}", t, offset),
            Temporal::Timestamp(ts) => write!(f, "{}", ts.to_rfc3339()),
        }
    }
}

/// A constant of a named enumeration.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EnumValue {
    pub type_name: String,
    pub constant: String,
}

impl EnumValue {
    pub fn new(type_name: impl Into<String>, constant: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            constant: constant.into(),
        }
    }
}

/// An instance of a user type, built by one of its constructors.
#[derive(Clone)]
pub struct ObjectValue {
    pub type_name: String,
    inner: Arc<dyn Any + Send + Sync>,
}

impl ObjectValue {
    pub fn new<T: Any + Send + Sync>(type_name: impl Into<String>, inner: T) -> Self {
        Self {
            type_name: type_name.into(),
            inner: Arc::new(inner),
        }
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.inner.downcast_ref::<T>()
    }
}

impl fmt::Debug for ObjectValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectValue({})", self.type_name)
    }
}

impl PartialEq for ObjectValue {
    fn eq(&self, other: &Self) -> bool {
        self.type_name == other.type_name && Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Byte(n) => write!(f, "{}", n),
            Value::Short(n) => write!(f, "{}", n),
            Value::Int(n) => write!(f, "{}", n),
            Value::Long(n) => write!(f, "{}", n),
            Value::Float(n) => write!(f, "{}", n),
            Value::Double(n) => write!(f, "{}", n),
            Value::BigInteger(n) => write!(f, "{}", n),
            Value::BigDecimal(n) => write!(f, "{}", n),
            Value::String(s) => write!(f, "{}", s),
            Value::Bytes(b) => write!(f, "[{}]", b.iter().join(", ")),
            Value::List(items) => write!(f, "[{}]", items.iter().join(", ")),
            Value::Map(entries) => write!(
                f,
                "{{{}}}",
                entries.iter().map(|(k, v)| format!("{}={}", k, v)).join(", ")
            ),
            Value::Temporal(t) => write!(f, "{}", t),
            Value::Duration(d) => write!(f, "{}", d),
            Value::Enum(e) => write!(f, "{}", e.constant),
            Value::Object(o) => write!(f, "#<{}>", o.type_name),
        }
    }
}

impl Value {
    pub fn type_name(&self) -> &str {
        match self {
            Value::Nil => "Nothing",
            Value::Bool(_) => "Boolean",
            Value::Byte(_) => "Byte",
            Value::Short(_) => "Short",
            Value::Int(_) => "Int",
            Value::Long(_) => "Long",
            Value::Float(_) => "Float",
            Value::Double(_) => "Double",
            Value::BigInteger(_) => "BigInteger",
            Value::BigDecimal(_) => "BigDecimal",
            Value::String(_) => "String",
            Value::Bytes(_) => "ByteArray",
            Value::List(_) => "List",
            Value::Map(_) => "Map",
            Value::Temporal(t) => t.kind().simple_name(),
            Value::Duration(_) => "Duration",
            Value::Enum(e) => &e.type_name,
            Value::Object(o) => &o.type_name,
        }
    }

    /// Width of a numeric value, `None` for everything else.
    pub fn number_kind(&self) -> Option<NumberKind> {
        match self {
            Value::Byte(_) => Some(NumberKind::I8),
            Value::Short(_) => Some(NumberKind::I16),
            Value::Int(_) => Some(NumberKind::I32),
            Value::Long(_) => Some(NumberKind::I64),
            Value::Float(_) => Some(NumberKind::F32),
            Value::Double(_) => Some(NumberKind::F64),
            Value::BigInteger(_) => Some(NumberKind::BigInteger),
            Value::BigDecimal(_) => Some(NumberKind::BigDecimal),
            _ => None,
        }
    }

    pub fn is_number(&self) -> bool {
        self.number_kind().is_some()
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&IndexMap<String, Value>> {
        match self {
            Value::Map(m) => Some(m),
            _ => None,
        }
    }
}

/// Typed extraction of a reconciled argument.
pub trait FromValue: Sized {
    fn from_value(value: Value) -> KeywordResult<Self>;
}

/// Conversion of a keyword's native result back into a [`Value`].
pub trait IntoValue {
    fn into_value(self) -> Value;
}

macro_rules! value_variant {
    ($ty:ty, $variant:ident, $expected:expr) => {
        impl FromValue for $ty {
            fn from_value(value: Value) -> KeywordResult<Self> {
                match value {
                    Value::$variant(v) => Ok(v),
                    other => Err(KeywordError::type_mismatch($expected, other.type_name())),
                }
            }
        }

        impl IntoValue for $ty {
            fn into_value(self) -> Value {
                Value::$variant(self)
            }
        }

        impl From<$ty> for Value {
            fn from(v: $ty) -> Self {
                Value::$variant(v)
            }
        }
    };
}

value_variant!(bool, Bool, "Boolean");
value_variant!(i8, Byte, "Byte");
value_variant!(i16, Short, "Short");
value_variant!(i32, Int, "Int");
value_variant!(i64, Long, "Long");
value_variant!(f32, Float, "Float");
value_variant!(f64, Double, "Double");
value_variant!(BigInt, BigInteger, "BigInteger");
value_variant!(BigDecimal, BigDecimal, "BigDecimal");
value_variant!(String, String, "String");
value_variant!(TimeDelta, Duration, "Duration");
value_variant!(Temporal, Temporal, "Temporal");
value_variant!(EnumValue, Enum, "Enum");
value_variant!(ObjectValue, Object, "Object");

macro_rules! temporal_variant {
    ($ty:ty, $variant:ident) => {
        impl FromValue for $ty {
            fn from_value(value: Value) -> KeywordResult<Self> {
                match value {
                    Value::Temporal(Temporal::$variant(v)) => Ok(v),
                    other => Err(KeywordError::type_mismatch(
                        TemporalKind::$variant.simple_name(),
                        other.type_name(),
                    )),
                }
            }
        }

        impl IntoValue for $ty {
            fn into_value(self) -> Value {
                Value::Temporal(Temporal::$variant(self))
            }
        }
    };
}

temporal_variant!(NaiveDate, LocalDate);
temporal_variant!(NaiveTime, LocalTime);
temporal_variant!(NaiveDateTime, LocalDateTime);
temporal_variant!(DateTime<Utc>, Timestamp);

// Zoned and offset date-times share one chrono representation
impl FromValue for DateTime<FixedOffset> {
    fn from_value(value: Value) -> KeywordResult<Self> {
        match value {
            Value::Temporal(Temporal::ZonedDateTime(dt))
            | Value::Temporal(Temporal::OffsetDateTime(dt)) => Ok(dt),
            other => Err(KeywordError::type_mismatch(
                TemporalKind::ZonedDateTime.simple_name(),
                other.type_name(),
            )),
        }
    }
}

impl IntoValue for DateTime<FixedOffset> {
    fn into_value(self) -> Value {
        Value::Temporal(Temporal::ZonedDateTime(self))
    }
}

impl FromValue for Value {
    fn from_value(value: Value) -> KeywordResult<Self> {
        Ok(value)
    }
}

impl IntoValue for Value {
    fn into_value(self) -> Value {
        self
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: Value) -> KeywordResult<Self> {
        match value {
            Value::Nil => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}

impl<T: IntoValue> IntoValue for Option<T> {
    fn into_value(self) -> Value {
        self.map(IntoValue::into_value).unwrap_or(Value::Nil)
    }
}

impl<T: FromValue> FromValue for Vec<T> {
    fn from_value(value: Value) -> KeywordResult<Self> {
        match value {
            Value::List(items) => items.into_iter().map(T::from_value).collect(),
            other => Err(KeywordError::type_mismatch("List", other.type_name())),
        }
    }
}

impl<T: IntoValue> IntoValue for Vec<T> {
    fn into_value(self) -> Value {
        Value::List(self.into_iter().map(IntoValue::into_value).collect())
    }
}

impl<T: FromValue> FromValue for IndexMap<String, T> {
    fn from_value(value: Value) -> KeywordResult<Self> {
        match value {
            Value::Map(entries) => entries
                .into_iter()
                .map(|(k, v)| T::from_value(v).map(|v| (k, v)))
                .collect(),
            other => Err(KeywordError::type_mismatch("Map", other.type_name())),
        }
    }
}

impl<T: IntoValue> IntoValue for IndexMap<String, T> {
    fn into_value(self) -> Value {
        Value::Map(self.into_iter().map(|(k, v)| (k, v.into_value())).collect())
    }
}

impl IntoValue for () {
    fn into_value(self) -> Value {
        Value::Nil
    }
}

impl IntoValue for &str {
    fn into_value(self) -> Value {
        Value::String(self.to_string())
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

impl From<IndexMap<String, Value>> for Value {
    fn from(entries: IndexMap<String, Value>) -> Self {
        Value::Map(entries)
    }
}
