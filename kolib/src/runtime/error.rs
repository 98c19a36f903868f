// Error handling for the keyword layer

use crate::conversion::ConversionError;
use thiserror::Error;

pub type KeywordResult<T> = Result<T, KeywordError>;

/// Errors raised while describing, binding or invoking keywords.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum KeywordError {
    /// The method is not public
    #[error("Function '{0}' is not accessible! Make it public.")]
    NotAccessible(String),

    #[error("Keyword functions may not abstract! Make '{0}' concrete.")]
    AbstractKeyword(String),

    #[error("Function '{0}' is not marked as keyword! Add a `Keyword` annotation to it.")]
    MissingKeywordAnnotation(String),

    #[error("Keyword annotation may only be placed on member functions! Move function '{0}' to a type.")]
    NotAMemberFunction(String),

    #[error("Parameter {0} is a vararg-parameter, which is not supported! Use List-type and mark it with 'KwdArg.kind = VARARG' to solve this.")]
    NativeVararg(String),

    #[error("The parameter {name} is marked as vararg but it's type {actual} is not a List!")]
    VarargNotList { name: String, actual: String },

    #[error("The parameter {name} is marked as kwarg but it's type {actual} is not a Map or its key-type parameter is not String")]
    KwargNotStringMap { name: String, actual: String },

    /// Every problem found while mapping the arguments of one call
    #[error("When calling the keyword '{keyword}', following argument mapping errors occurred:\n\t{}", .errors.join("\n\t"))]
    ArgumentMapping { keyword: String, errors: Vec<String> },

    #[error("Unable to convert argument '{parameter}' of keyword '{keyword}': {source}")]
    ArgumentConversion {
        keyword: String,
        parameter: String,
        #[source]
        source: ConversionError,
    },

    #[error("No keyword with name '{0}' found")]
    UnknownKeyword(String),

    #[error("Keyword '{keyword}' is missing a value for parameter '{parameter}'")]
    MissingArgument { keyword: String, parameter: String },

    #[error("Keyword '{keyword}' must be called on an instance of {expected}")]
    ReceiverMismatch { keyword: String, expected: String },

    #[error("Type mismatch: expected {expected}, got {actual}")]
    TypeMismatch { expected: String, actual: String },

    /// Failure reported by a keyword body
    #[error("{0}")]
    Failed(String),

    #[error("No component registered for type '{0}'")]
    ComponentNotFound(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl KeywordError {
    pub fn type_mismatch(expected: impl Into<String>, actual: impl Into<String>) -> Self {
        KeywordError::TypeMismatch {
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// True for the errors raised while building a descriptor from method metadata.
    pub fn is_construction_error(&self) -> bool {
        matches!(
            self,
            KeywordError::NotAccessible(_)
                | KeywordError::AbstractKeyword(_)
                | KeywordError::MissingKeywordAnnotation(_)
                | KeywordError::NotAMemberFunction(_)
                | KeywordError::NativeVararg(_)
                | KeywordError::VarargNotList { .. }
                | KeywordError::KwargNotStringMap { .. }
        )
    }
}
