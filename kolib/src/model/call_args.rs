use crate::runtime::{FromValue, KeywordError, KeywordResult, Value};

/// Reconciled and converted arguments of one call, in declaration order.
///
/// A slot is `None` when the caller supplied nothing for it, which lets the
/// native default apply. `Some(Value::Nil)` is an explicit null.
#[derive(Debug, Clone, PartialEq)]
pub struct CallArgs {
    keyword: String,
    slots: Vec<(String, Option<Value>)>,
}

impl CallArgs {
    pub fn new(keyword: impl Into<String>, slots: Vec<(String, Option<Value>)>) -> Self {
        Self {
            keyword: keyword.into(),
            slots,
        }
    }

    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn is_set(&self, index: usize) -> bool {
        matches!(self.slots.get(index), Some((_, Some(_))))
    }

    pub fn raw(&self, index: usize) -> Option<&Value> {
        self.slots.get(index).and_then(|(_, v)| v.as_ref())
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.slots.iter().position(|(n, _)| n == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.slots.iter().map(|(n, _)| n.as_str())
    }

    /// Value of a parameter without a native default.
    pub fn get<T: FromValue>(&self, index: usize) -> KeywordResult<T> {
        match self.slots.get(index) {
            Some((_, Some(value))) => T::from_value(value.clone()),
            Some((name, None)) => Err(KeywordError::MissingArgument {
                keyword: self.keyword.clone(),
                parameter: name.clone(),
            }),
            None => Err(KeywordError::MissingArgument {
                keyword: self.keyword.clone(),
                parameter: format!("arg{}", index),
            }),
        }
    }

    /// Value of a parameter, or its native default when unset.
    pub fn get_or<T: FromValue>(&self, index: usize, default: T) -> KeywordResult<T> {
        if self.is_set(index) {
            self.get(index)
        } else {
            Ok(default)
        }
    }

    pub fn opt<T: FromValue>(&self, index: usize) -> KeywordResult<Option<T>> {
        if self.is_set(index) {
            self.get::<Option<T>>(index)
        } else {
            Ok(None)
        }
    }

    pub fn into_values(self) -> Vec<Option<Value>> {
        self.slots.into_iter().map(|(_, v)| v).collect()
    }
}
