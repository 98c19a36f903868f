//! Argument reconciliation.
//!
//! Maps the positional list and the named map supplied by the engine onto the
//! declared parameters of a keyword.
//!
//! # Rules:
//! - Positional values bind in declaration order. A VARARG parameter takes all
//!   remaining positional values, so it ends the positional walk.
//! - A named value binds the parameter of the same name. Naming a parameter that
//!   is already bound positionally is an error, never an override.
//! - Named values matching no parameter overflow into the KWARG parameter, merged
//!   into a map it may already hold. Without a KWARG parameter every unmatched
//!   key is reported.
//! - All errors of one call are collected and reported together.
//! - A non-optional VARARG or KWARG parameter left unbound gets an empty list or map.

use crate::model::annotation::ParameterKind;
use crate::model::parameter::KeywordParameterDescriptor;
use crate::runtime::Value;
use indexmap::IndexMap;
use itertools::Itertools;

/// Binding of one call: `None` is unset, `Some(Value::Nil)` an explicit null.
pub type BoundParams = IndexMap<String, Option<Value>>;

pub fn bind_arguments(
    params: &[KeywordParameterDescriptor],
    args: Vec<Value>,
    kwargs: IndexMap<String, Value>,
) -> Result<BoundParams, Vec<String>> {
    let mut bound: BoundParams = params
        .iter()
        .map(|p| (p.name().to_string(), None))
        .collect();
    let mut errors = Vec::new();

    // 1. positional values
    let supplied = args.len();
    let mut remaining = args.into_iter();
    for param in params {
        if remaining.len() == 0 {
            break;
        }
        let value = if param.kind() == ParameterKind::Vararg {
            Value::List(remaining.by_ref().collect())
        } else {
            remaining.next().unwrap_or(Value::Nil)
        };
        bound.insert(param.name().to_string(), Some(value));
    }
    if remaining.len() > 0 {
        errors.push(format!(
            "Too many positional arguments! Expected at most {} but got {}",
            params.len(),
            supplied
        ));
    }

    // 2. named values
    let mut overflow = IndexMap::new();
    for (key, value) in kwargs {
        match bound.get_mut(&key) {
            Some(Some(_)) => errors.push(format!(
                "The parameter with name '{}' was already set from positional arguments",
                key
            )),
            Some(slot) => *slot = Some(value),
            None => {
                overflow.insert(key, value);
            }
        }
    }

    // 3. leftovers go to the kwarg parameter
    if !overflow.is_empty() {
        match params.iter().find(|p| p.kind() == ParameterKind::Kwarg) {
            Some(kwarg) => {
                if let Err(error) = merge_overflow(&mut bound, kwarg.name(), overflow) {
                    errors.push(error);
                }
            }
            None => errors.push(format!(
                "No kwArg-Parameter found but arguments left! The following kwArgs are left over: [{}]",
                overflow.keys().join(", ")
            )),
        }
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    for param in params.iter().filter(|p| !p.is_optional()) {
        let slot = bound.entry(param.name().to_string()).or_insert(None);
        if slot.is_none() {
            match param.kind() {
                ParameterKind::Vararg => *slot = Some(Value::List(Vec::new())),
                ParameterKind::Kwarg => *slot = Some(Value::Map(IndexMap::new())),
                ParameterKind::Value => {}
            }
        }
    }

    Ok(bound)
}

fn merge_overflow(
    bound: &mut BoundParams,
    name: &str,
    overflow: IndexMap<String, Value>,
) -> Result<(), String> {
    let slot = bound.entry(name.to_string()).or_insert(None);
    match slot.take() {
        None | Some(Value::Nil) => {
            *slot = Some(Value::Map(overflow));
            Ok(())
        }
        Some(Value::Map(mut existing)) => {
            existing.extend(overflow);
            *slot = Some(Value::Map(existing));
            Ok(())
        }
        Some(other) => {
            let message = format!(
                "Unable to extend existing kwArg-map: {} with remaining kwArgs {}! Conversion error: a value of type {} is not a Map",
                other,
                Value::Map(overflow),
                other.type_name()
            );
            *slot = Some(other);
            Err(message)
        }
    }
}
