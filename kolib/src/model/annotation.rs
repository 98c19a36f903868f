//! Keyword metadata attached to methods and their parameters.

use crate::runtime::ValueType;
use std::fmt;

/// How a parameter takes part in argument reconciliation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ParameterKind {
    /// One positional or named value
    #[default]
    Value,
    /// Collects all remaining positional values into one list
    Vararg,
    /// Collects all unmatched named values into one string-keyed map
    Kwarg,
}

impl fmt::Display for ParameterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParameterKind::Value => write!(f, "VALUE"),
            ParameterKind::Vararg => write!(f, "VARARG"),
            ParameterKind::Kwarg => write!(f, "KWARG"),
        }
    }
}

/// Marks a method as keyword.
///
/// The external name defaults to the method name. Summary lines are trimmed and
/// joined into one paragraph, detail lines are kept as written. Tags are trimmed
/// and their inner whitespace is folded to one space.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Keyword {
    pub name: String,
    pub doc_summary: Vec<String>,
    pub doc_details: Vec<String>,
    pub tags: Vec<String>,
}

impl Keyword {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_summary(mut self, line: impl Into<String>) -> Self {
        self.doc_summary.push(line.into());
        self
    }

    pub fn with_details(mut self, line: impl Into<String>) -> Self {
        self.doc_details.push(line.into());
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }
}

/// Additional information on a keyword parameter.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KwdArg {
    /// Documentation fragment of the parameter
    pub doc: String,
    /// Default as literal text, documentation only
    pub default: Option<String>,
    pub kind: ParameterKind,
    /// Overrides the declared type
    pub type_override: Option<ValueType>,
    /// Overrides the name recovered from the signature
    pub name: Option<String>,
}

impl KwdArg {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vararg() -> Self {
        Self {
            kind: ParameterKind::Vararg,
            ..Self::default()
        }
    }

    pub fn kwarg() -> Self {
        Self {
            kind: ParameterKind::Kwarg,
            ..Self::default()
        }
    }

    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = doc.into();
        self
    }

    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn with_kind(mut self, kind: ParameterKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_type(mut self, value_type: ValueType) -> Self {
        self.type_override = Some(value_type);
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}
