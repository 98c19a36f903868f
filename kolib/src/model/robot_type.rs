use crate::runtime::{NumberKind, ValueType};
use std::fmt;

/// Type hint handed to the engine for its own argument coercion.
#[derive(Debug, Clone, PartialEq)]
pub enum RobotType {
    Int,
    Float,
    Bool,
    Str,
    DateTime,
    TimeDelta,
    ByteArray,
    /// No protocol tag exists, the declared type is passed through
    Raw(ValueType),
}

impl RobotType {
    pub fn as_str(&self) -> &str {
        match self {
            RobotType::Int => "int",
            RobotType::Float => "float",
            RobotType::Bool => "bool",
            RobotType::Str => "str",
            RobotType::DateTime => "datetime",
            RobotType::TimeDelta => "timedelta",
            RobotType::ByteArray => "bytearray",
            RobotType::Raw(value_type) => value_type.simple_name(),
        }
    }
}

impl From<&ValueType> for RobotType {
    fn from(value_type: &ValueType) -> Self {
        match value_type {
            ValueType::Number(
                NumberKind::I8 | NumberKind::I16 | NumberKind::I32 | NumberKind::I64,
            ) => RobotType::Int,
            ValueType::Number(NumberKind::F32 | NumberKind::F64) => RobotType::Float,
            ValueType::Bool => RobotType::Bool,
            ValueType::String => RobotType::Str,
            ValueType::Temporal(_) => RobotType::DateTime,
            ValueType::Duration => RobotType::TimeDelta,
            ValueType::Bytes => RobotType::ByteArray,
            other => RobotType::Raw(other.clone()),
        }
    }
}

impl fmt::Display for RobotType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::TemporalKind;

    #[test]
    fn numeric_widths_collapse() {
        for kind in [NumberKind::I8, NumberKind::I16, NumberKind::I32, NumberKind::I64] {
            assert_eq!(RobotType::from(&ValueType::Number(kind)), RobotType::Int);
        }
        assert_eq!(RobotType::from(&ValueType::Number(NumberKind::F32)), RobotType::Float);
    }

    #[test]
    fn big_numbers_pass_through() {
        let big = ValueType::Number(NumberKind::BigDecimal);
        assert_eq!(RobotType::from(&big), RobotType::Raw(big.clone()));
        assert_eq!(RobotType::from(&big).as_str(), "BigDecimal");
    }

    #[test]
    fn fixed_tags() {
        let offset_time = ValueType::Temporal(TemporalKind::OffsetTime);
        assert_eq!(RobotType::from(&offset_time).as_str(), "datetime");
        assert_eq!(RobotType::from(&ValueType::Duration).as_str(), "timedelta");
        assert_eq!(RobotType::from(&ValueType::Bytes).as_str(), "bytearray");
        assert_eq!(RobotType::from(&ValueType::String).as_str(), "str");
    }
}
