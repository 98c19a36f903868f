//! Descriptor of one keyword parameter.

use crate::conversion::{
    to_boolean, to_duration, to_enum, to_number, to_temporal, ConversionError, ConversionResult,
};
use crate::model::annotation::{KwdArg, ParameterKind};
use crate::model::reflect::{ParamInfo, Visibility};
use crate::runtime::{KeywordError, KeywordResult, NumberKind, ObjectType, Value, ValueType};
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::ser::{Serialize, SerializeSeq, Serializer};

/// Names the compiler synthesizes when the real name is not retained.
static SYNTHETIC_NAME: Lazy<Regex> = Lazy::new(|| Regex::new(r"^arg\d+$").unwrap());

/// Argument entry of the engine's argument specification.
#[derive(Debug, Clone, PartialEq)]
pub enum RobotArgument {
    /// `name`, `*name` or `**name`
    Required(String),
    /// `name` with its default text, if one is documented
    Optional(String, Option<String>),
}

impl RobotArgument {
    pub fn name(&self) -> &str {
        match self {
            RobotArgument::Required(name) | RobotArgument::Optional(name, _) => name,
        }
    }

    pub fn to_value(&self) -> Value {
        match self {
            RobotArgument::Required(name) => Value::List(vec![Value::from(name.as_str())]),
            RobotArgument::Optional(name, default) => Value::List(vec![
                Value::from(name.as_str()),
                default
                    .as_deref()
                    .map(Value::from)
                    .unwrap_or(Value::Nil),
            ]),
        }
    }
}

impl Serialize for RobotArgument {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            RobotArgument::Required(name) => {
                let mut seq = serializer.serialize_seq(Some(1))?;
                seq.serialize_element(name)?;
                seq.end()
            }
            RobotArgument::Optional(name, default) => {
                let mut seq = serializer.serialize_seq(Some(2))?;
                seq.serialize_element(name)?;
                seq.serialize_element(default)?;
                seq.end()
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct KeywordParameterDescriptor {
    position: usize,
    name: String,
    kind: ParameterKind,
    /// Type of the native parameter, the conversion target
    native_type: ValueType,
    /// Annotation override or the native type, used for docs and type hints
    value_type: ValueType,
    optional: bool,
    default: Option<String>,
    doc: String,
}

impl KeywordParameterDescriptor {
    pub fn new(param: &ParamInfo) -> KeywordResult<Self> {
        let annotation = param.annotation.clone().unwrap_or_default();
        let name = determine_name(param, &annotation);

        // native rest parameters cannot be bound, only List-typed VARARG parameters
        if param.native_vararg {
            return Err(KeywordError::NativeVararg(name));
        }

        let value_type = annotation
            .type_override
            .clone()
            .unwrap_or_else(|| param.value_type.clone());

        match annotation.kind {
            ParameterKind::Vararg if !value_type.is_list() => {
                return Err(KeywordError::VarargNotList {
                    name,
                    actual: value_type.to_string(),
                })
            }
            ParameterKind::Kwarg if !value_type.is_string_keyed_map() => {
                return Err(KeywordError::KwargNotStringMap {
                    name,
                    actual: value_type.to_string(),
                })
            }
            _ => {}
        }

        Ok(Self {
            position: param.index,
            name,
            kind: annotation.kind,
            native_type: param.value_type.clone(),
            value_type,
            optional: param.has_default,
            default: annotation.default,
            doc: annotation.doc,
        })
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ParameterKind {
        self.kind
    }

    pub fn value_type(&self) -> &ValueType {
        &self.value_type
    }

    pub fn is_optional(&self) -> bool {
        self.optional
    }

    pub fn default(&self) -> Option<&str> {
        self.default.as_deref()
    }

    /// `name [Type] doc`, followed by the documented default if there is one.
    pub fn documentation(&self) -> String {
        let default = self
            .default
            .as_ref()
            .map(|d| format!("\n\tDEFAULT: `{}`", d))
            .unwrap_or_default();
        format!(
            "{} [{}] {}{}",
            self.name,
            self.value_type.simple_name(),
            self.doc.trim(),
            default
        )
        .trim()
        .to_string()
    }

    pub fn robot_argument(&self) -> RobotArgument {
        let name = match self.kind {
            ParameterKind::Value => self.name.clone(),
            ParameterKind::Vararg => format!("*{}", self.name),
            ParameterKind::Kwarg => format!("**{}", self.name),
        };
        // VARARG and KWARG are optional to the engine anyway
        if self.optional && self.kind == ParameterKind::Value {
            RobotArgument::Optional(name, self.default.clone())
        } else {
            RobotArgument::Required(name)
        }
    }

    /// Converts a supplied value to the native parameter type.
    ///
    /// `None` and `Nil` both yield `Nil`.
    pub fn convert_to_target_type(&self, raw: Option<Value>) -> ConversionResult<Value> {
        match raw {
            None => Ok(Value::Nil),
            Some(value) => convert_value(&self.native_type, value),
        }
    }
}

fn determine_name(param: &ParamInfo, annotation: &KwdArg) -> String {
    if let Some(name) = annotation.name.as_deref().filter(|n| !n.trim().is_empty()) {
        return name.trim().to_string();
    }
    match param.name.as_deref() {
        Some(name) if !name.trim().is_empty() && !SYNTHETIC_NAME.is_match(name) => name.to_string(),
        _ => format!("arg{}", param.index),
    }
}

/// Converts `value` to `target`, trying the strategies by target category.
pub fn convert_value(target: &ValueType, value: Value) -> ConversionResult<Value> {
    if target.is_assignable_from(&value) {
        return Ok(value);
    }
    match target {
        ValueType::Bool => to_boolean(&value).map(Value::Bool),
        ValueType::Number(kind) => to_number(&value, *kind),
        ValueType::Bytes => to_bytes(value),
        ValueType::List(element) => match value {
            Value::List(items) => items
                .into_iter()
                .map(|item| convert_value(element, item))
                .collect::<ConversionResult<Vec<_>>>()
                .map(Value::List),
            other => Err(unconvertible(&other, target)),
        },
        ValueType::Map(_, value_type) => match value {
            Value::Map(entries) => entries
                .into_iter()
                .map(|(k, v)| convert_value(value_type, v).map(|v| (k, v)))
                .collect::<ConversionResult<IndexMap<_, _>>>()
                .map(Value::Map),
            other => Err(unconvertible(&other, target)),
        },
        ValueType::Temporal(kind) => to_temporal(&value, *kind),
        ValueType::Duration => to_duration(&value),
        ValueType::String => Ok(Value::String(value.to_string())),
        ValueType::Enum(enum_type) => to_enum(&value, enum_type),
        ValueType::Object(object_type) => construct(object_type, value),
        ValueType::Any => Ok(value),
    }
}

fn to_bytes(value: Value) -> ConversionResult<Value> {
    let target = ValueType::Bytes;
    match value {
        Value::List(items) => items
            .iter()
            .map(|item| match to_number(item, NumberKind::I8)? {
                Value::Byte(b) => Ok(b as u8),
                other => Err(unconvertible(&other, &target)),
            })
            .collect::<ConversionResult<Vec<u8>>>()
            .map(Value::Bytes),
        other => Err(unconvertible(&other, &target)),
    }
}

/// Last resort: the single public one-argument constructor accepting the value.
fn construct(object_type: &ObjectType, value: Value) -> ConversionResult<Value> {
    let mut matching = object_type
        .constructors
        .iter()
        .filter(|c| c.visibility == Visibility::Public && c.param.is_assignable_from(&value));
    match (matching.next(), matching.next()) {
        (Some(constructor), None) => {
            let rendered = value.to_string();
            (constructor.build)(value).map_err(|message| ConversionError::ConstructorFailed {
                value: rendered,
                target: object_type.name.clone(),
                message,
            })
        }
        _ => Err(ConversionError::Unconvertible {
            value: value.to_string(),
            actual: value.type_name().to_string(),
            target: object_type.name.clone(),
        }),
    }
}

fn unconvertible(value: &Value, target: &ValueType) -> ConversionError {
    ConversionError::Unconvertible {
        value: value.to_string(),
        actual: value.type_name().to_string(),
        target: target.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builders::ParamBuilder;
    use crate::runtime::{EnumType, EnumValue, ObjectValue};
    use pretty_assertions::assert_eq;

    fn descriptor(param: ParamBuilder) -> KeywordParameterDescriptor {
        KeywordParameterDescriptor::new(&param.build(0)).unwrap()
    }

    #[test]
    fn plain_parameter_uses_signature_name() {
        let desc = descriptor(ParamBuilder::new("test", ValueType::String));
        assert_eq!(desc.name(), "test");
        assert_eq!(desc.kind(), ParameterKind::Value);
        assert!(!desc.is_optional());
        assert_eq!(desc.documentation(), "test [String]");
        assert_eq!(desc.robot_argument(), RobotArgument::Required("test".to_string()));
    }

    #[test]
    fn annotation_name_overrides_signature() {
        let desc = descriptor(
            ParamBuilder::new("test", ValueType::String)
                .with_kwd_arg(KwdArg::new().with_name(" age ")),
        );
        assert_eq!(desc.name(), "age");
    }

    #[test]
    fn missing_or_synthetic_names_fall_back_to_position() {
        let unnamed =
            KeywordParameterDescriptor::new(&ParamBuilder::unnamed(ValueType::Any).build(2))
                .unwrap();
        assert_eq!(unnamed.name(), "arg2");
        let synthetic =
            KeywordParameterDescriptor::new(&ParamBuilder::new("arg7", ValueType::Any).build(1))
                .unwrap();
        assert_eq!(synthetic.name(), "arg1");
    }

    #[test]
    fn documentation_includes_default() {
        let desc = descriptor(
            ParamBuilder::new("age", ValueType::Number(NumberKind::I32))
                .with_default()
                .with_kwd_arg(KwdArg::new().with_doc(" The age ").with_default("18")),
        );
        assert_eq!(desc.documentation(), "age [Int] The age\n\tDEFAULT: `18`");
        assert_eq!(
            desc.robot_argument(),
            RobotArgument::Optional("age".to_string(), Some("18".to_string()))
        );
    }

    #[test]
    fn type_override_drives_documentation() {
        let desc = descriptor(
            ParamBuilder::new("when", ValueType::Any)
                .with_kwd_arg(KwdArg::new().with_type(ValueType::Duration)),
        );
        assert_eq!(desc.value_type(), &ValueType::Duration);
        assert_eq!(desc.documentation(), "when [Duration]");
    }

    #[test]
    fn vararg_must_be_list() {
        let param = ParamBuilder::new("items", ValueType::String).with_kwd_arg(KwdArg::vararg());
        let err = KeywordParameterDescriptor::new(&param.build(0)).unwrap_err();
        assert!(matches!(err, KeywordError::VarargNotList { .. }));

        let ok = descriptor(
            ParamBuilder::new("items", ValueType::list_of(ValueType::String))
                .with_kwd_arg(KwdArg::vararg()),
        );
        assert_eq!(ok.robot_argument(), RobotArgument::Required("*items".to_string()));
    }

    #[test]
    fn kwarg_must_be_string_keyed_map() {
        let int_keyed = ValueType::map_of(ValueType::Number(NumberKind::I32), ValueType::Any);
        let param = ParamBuilder::new("opts", int_keyed).with_kwd_arg(KwdArg::kwarg());
        let err = KeywordParameterDescriptor::new(&param.build(0)).unwrap_err();
        assert!(matches!(err, KeywordError::KwargNotStringMap { .. }));

        let ok = descriptor(
            ParamBuilder::new("opts", ValueType::string_map_of(ValueType::Any))
                .with_default()
                .with_kwd_arg(KwdArg::kwarg()),
        );
        // optional kwargs are not re-encoded
        assert_eq!(ok.robot_argument(), RobotArgument::Required("**opts".to_string()));
    }

    #[test]
    fn robot_argument_encodes_as_sequence() {
        let optional = RobotArgument::Optional("age".to_string(), Some("18".to_string()));
        assert_eq!(serde_json::to_value(&optional).unwrap(), serde_json::json!(["age", "18"]));
        assert_eq!(
            optional.to_value(),
            Value::List(vec![Value::from("age"), Value::from("18")])
        );
        let required = RobotArgument::Required("*rest".to_string());
        assert_eq!(serde_json::to_value(&required).unwrap(), serde_json::json!(["*rest"]));
        assert_eq!(required.name(), "*rest");
    }

    #[test]
    fn native_vararg_is_rejected() {
        let param = ParamBuilder::new("rest", ValueType::list_of(ValueType::Any)).native_vararg();
        let err = KeywordParameterDescriptor::new(&param.build(0)).unwrap_err();
        assert_eq!(err, KeywordError::NativeVararg("rest".to_string()));
    }

    #[test]
    fn assignable_values_pass_unchanged() {
        let desc = descriptor(ParamBuilder::new("n", ValueType::Number(NumberKind::I64)));
        assert_eq!(desc.convert_to_target_type(Some(Value::Long(5))), Ok(Value::Long(5)));
        assert_eq!(desc.convert_to_target_type(None), Ok(Value::Nil));
        assert_eq!(desc.convert_to_target_type(Some(Value::Nil)), Ok(Value::Nil));
    }

    #[test]
    fn converts_by_category() {
        assert_eq!(
            convert_value(&ValueType::Number(NumberKind::I32), Value::from("12")),
            Ok(Value::Int(12))
        );
        assert_eq!(convert_value(&ValueType::String, Value::Int(12)), Ok(Value::from("12")));
        assert_eq!(
            convert_value(&ValueType::Bytes, Value::List(vec![Value::Int(1), Value::from("-1")])),
            Ok(Value::Bytes(vec![1, 255]))
        );
        assert_eq!(
            convert_value(
                &ValueType::list_of(ValueType::Number(NumberKind::I32)),
                Value::List(vec![Value::from("1"), Value::Long(2)])
            ),
            Ok(Value::List(vec![Value::Int(1), Value::Int(2)]))
        );
        let level = EnumType::new("Level", ["LOW", "HIGH"]);
        assert_eq!(
            convert_value(&ValueType::enumeration(level), Value::from("high")),
            Ok(Value::Enum(EnumValue::new("Level", "HIGH")))
        );
    }

    #[derive(Debug, PartialEq)]
    struct Email(String);

    fn email_type() -> ObjectType {
        ObjectType::new("Email")
            .with_constructor(Visibility::Private, ValueType::Any, |_| Err("hidden".to_string()))
            .with_constructor(Visibility::Public, ValueType::String, |v| match v {
                Value::String(s) if s.contains('@') => {
                    Ok(Value::Object(ObjectValue::new("Email", Email(s))))
                }
                other => Err(format!("'{}' is not an address", other)),
            })
    }

    #[test]
    fn public_constructor_is_last_resort() {
        let value = convert_value(&ValueType::object(email_type()), Value::from("a@b.c")).unwrap();
        match value {
            Value::Object(o) => assert_eq!(o.downcast_ref::<Email>(), Some(&Email("a@b.c".into()))),
            other => panic!("expected object, got {:?}", other),
        }
    }

    #[test]
    fn no_matching_constructor_is_unconvertible() {
        let err = convert_value(&ValueType::object(email_type()), Value::Int(1)).unwrap_err();
        assert!(matches!(err, ConversionError::Unconvertible { .. }));
        let err = convert_value(&ValueType::object(email_type()), Value::from("nope")).unwrap_err();
        assert!(matches!(err, ConversionError::ConstructorFailed { .. }));
    }
}
