//! Declared value types
//!
//! A `ValueType` is what a keyword parameter declares. The binding layer asks it
//! whether an incoming [`Value`] already satisfies it, and the conversion layer
//! dispatches on its category when it does not.

use crate::model::Visibility;
use crate::runtime::values::Value;
use std::fmt;
use std::sync::Arc;

/// Width of a numeric target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumberKind {
    I8,
    I16,
    I32,
    I64,
    F32,
    F64,
    BigInteger,
    BigDecimal,
}

impl NumberKind {
    pub fn simple_name(&self) -> &'static str {
        match self {
            NumberKind::I8 => "Byte",
            NumberKind::I16 => "Short",
            NumberKind::I32 => "Int",
            NumberKind::I64 => "Long",
            NumberKind::F32 => "Float",
            NumberKind::F64 => "Double",
            NumberKind::BigInteger => "BigInteger",
            NumberKind::BigDecimal => "BigDecimal",
        }
    }

    pub fn is_integral(&self) -> bool {
        matches!(
            self,
            NumberKind::I8 | NumberKind::I16 | NumberKind::I32 | NumberKind::I64
        )
    }

    pub fn is_floating(&self) -> bool {
        matches!(self, NumberKind::F32 | NumberKind::F64)
    }
}

/// Shape of a temporal target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemporalKind {
    LocalDate,
    LocalTime,
    LocalDateTime,
    ZonedDateTime,
    OffsetDateTime,
    OffsetTime,
    /// Legacy calendar timestamp, an instant on the UTC line
    Timestamp,
}

impl TemporalKind {
    pub fn simple_name(&self) -> &'static str {
        match self {
            TemporalKind::LocalDate => "LocalDate",
            TemporalKind::LocalTime => "LocalTime",
            TemporalKind::LocalDateTime => "LocalDateTime",
            TemporalKind::ZonedDateTime => "ZonedDateTime",
            TemporalKind::OffsetDateTime => "OffsetDateTime",
            TemporalKind::OffsetTime => "OffsetTime",
            TemporalKind::Timestamp => "Date",
        }
    }
}

/// A named enumeration and its constants in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumType {
    pub name: String,
    pub constants: Vec<String>,
}

impl EnumType {
    pub fn new<I, S>(name: impl Into<String>, constants: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            constants: constants.into_iter().map(Into::into).collect(),
        }
    }

    pub fn value_of(&self, constant: &str) -> Option<Value> {
        self.constants
            .iter()
            .find(|c| c.as_str() == constant)
            .map(|c| Value::Enum(crate::runtime::EnumValue::new(&self.name, c)))
    }
}

pub type ConstructorFn = dyn Fn(Value) -> Result<Value, String> + Send + Sync;

/// A single-argument constructor published by an object type.
#[derive(Clone)]
pub struct Constructor {
    pub visibility: Visibility,
    pub param: ValueType,
    pub build: Arc<ConstructorFn>,
}

impl fmt::Debug for Constructor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Constructor")
            .field("visibility", &self.visibility)
            .field("param", &self.param)
            .finish()
    }
}

/// An opaque user type. Values of it can only be produced by its constructors.
#[derive(Debug, Clone)]
pub struct ObjectType {
    pub name: String,
    pub constructors: Vec<Constructor>,
}

impl ObjectType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            constructors: Vec::new(),
        }
    }

    pub fn with_constructor<F>(mut self, visibility: Visibility, param: ValueType, build: F) -> Self
    where
        F: Fn(Value) -> Result<Value, String> + Send + Sync + 'static,
    {
        self.constructors.push(Constructor {
            visibility,
            param,
            build: Arc::new(build),
        });
        self
    }
}

impl PartialEq for ObjectType {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

/// The declared type of a keyword parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum ValueType {
    Any,
    Bool,
    Number(NumberKind),
    String,
    Bytes,
    List(Box<ValueType>),
    Map(Box<ValueType>, Box<ValueType>),
    Temporal(TemporalKind),
    Duration,
    Enum(Arc<EnumType>),
    Object(Arc<ObjectType>),
}

impl ValueType {
    pub fn list_of(element: ValueType) -> Self {
        ValueType::List(Box::new(element))
    }

    pub fn map_of(key: ValueType, value: ValueType) -> Self {
        ValueType::Map(Box::new(key), Box::new(value))
    }

    /// `Map<String, value>`, the shape a KWARG parameter must have.
    pub fn string_map_of(value: ValueType) -> Self {
        Self::map_of(ValueType::String, value)
    }

    pub fn enumeration(enum_type: EnumType) -> Self {
        ValueType::Enum(Arc::new(enum_type))
    }

    pub fn object(object_type: ObjectType) -> Self {
        ValueType::Object(Arc::new(object_type))
    }

    pub fn is_list(&self) -> bool {
        matches!(self, ValueType::List(_))
    }

    pub fn is_string_keyed_map(&self) -> bool {
        matches!(self, ValueType::Map(key, _) if **key == ValueType::String)
    }

    /// Name of the type without generic arguments.
    pub fn simple_name(&self) -> &str {
        match self {
            ValueType::Any => "Any",
            ValueType::Bool => "Boolean",
            ValueType::Number(kind) => kind.simple_name(),
            ValueType::String => "String",
            ValueType::Bytes => "ByteArray",
            ValueType::List(_) => "List",
            ValueType::Map(_, _) => "Map",
            ValueType::Temporal(kind) => kind.simple_name(),
            ValueType::Duration => "Duration",
            ValueType::Enum(e) => &e.name,
            ValueType::Object(o) => &o.name,
        }
    }

    /// Whether `value` already satisfies this type and can be passed through unchanged.
    ///
    /// `Nil` satisfies every type; absence is handled by optionality, not here.
    pub fn is_assignable_from(&self, value: &Value) -> bool {
        match (self, value) {
            (_, Value::Nil) => true,
            (ValueType::Any, _) => true,
            (ValueType::Bool, Value::Bool(_)) => true,
            (ValueType::Number(kind), v) => v.number_kind() == Some(*kind),
            (ValueType::String, Value::String(_)) => true,
            (ValueType::Bytes, Value::Bytes(_)) => true,
            (ValueType::List(element), Value::List(items)) => {
                items.iter().all(|item| element.is_assignable_from(item))
            }
            (ValueType::Map(_, value_type), Value::Map(entries)) => {
                entries.values().all(|v| value_type.is_assignable_from(v))
            }
            (ValueType::Temporal(kind), Value::Temporal(t)) => t.kind() == *kind,
            (ValueType::Duration, Value::Duration(_)) => true,
            (ValueType::Enum(e), Value::Enum(v)) => {
                v.type_name == e.name && e.constants.contains(&v.constant)
            }
            (ValueType::Object(o), Value::Object(v)) => v.type_name == o.name,
            _ => false,
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueType::List(element) => write!(f, "List<{}>", element),
            ValueType::Map(key, value) => write!(f, "Map<{}, {}>", key, value),
            other => write!(f, "{}", other.simple_name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;

    #[test]
    fn list_assignability_checks_elements() {
        let strings = ValueType::list_of(ValueType::String);
        assert!(strings.is_assignable_from(&Value::List(vec![Value::from("a")])));
        assert!(!strings.is_assignable_from(&Value::List(vec![Value::Int(1)])));
        let anything = ValueType::list_of(ValueType::Any);
        assert!(anything.is_assignable_from(&Value::List(vec![Value::Int(1)])));
    }

    #[test]
    fn numbers_must_match_width() {
        let int = ValueType::Number(NumberKind::I32);
        assert!(int.is_assignable_from(&Value::Int(3)));
        assert!(!int.is_assignable_from(&Value::Long(3)));
        assert!(!int.is_assignable_from(&Value::from("3")));
    }

    #[test]
    fn kwarg_shape_requires_string_keys() {
        assert!(ValueType::string_map_of(ValueType::Any).is_string_keyed_map());
        assert!(!ValueType::map_of(ValueType::Number(NumberKind::I32), ValueType::Any)
            .is_string_keyed_map());
        assert!(ValueType::string_map_of(ValueType::Any)
            .is_assignable_from(&Value::Map(IndexMap::new())));
    }

    #[test]
    fn display_uses_simple_names() {
        assert_eq!(ValueType::Number(NumberKind::I32).to_string(), "Int");
        assert_eq!(ValueType::list_of(ValueType::String).simple_name(), "List");
        assert_eq!(
            ValueType::string_map_of(ValueType::Any).to_string(),
            "Map<String, Any>"
        );
    }
}
