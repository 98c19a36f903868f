//! Method metadata published by keyword-bearing types.
//!
//! Descriptors are built from this metadata once, at discovery time. The only
//! dynamic step left at call time is the invoker closure, which downcasts the
//! receiver and calls the native method.

use crate::model::annotation::{Keyword, KwdArg};
use crate::model::call_args::CallArgs;
use crate::runtime::{KeywordResult, Value, ValueType};
use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    #[default]
    Public,
    Protected,
    Internal,
    Private,
}

/// Identifies the type that declares a keyword method.
#[derive(Debug, Clone)]
pub struct TypeHandle {
    pub name: String,
    pub type_id: TypeId,
    /// Path of the file declaring the type, for IDE navigation
    pub source: Option<String>,
}

impl TypeHandle {
    pub fn of<T: Any>() -> Self {
        let full = std::any::type_name::<T>();
        let name = full.rsplit("::").next().unwrap_or(full).to_string();
        Self {
            name,
            type_id: TypeId::of::<T>(),
            source: None,
        }
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

impl PartialEq for TypeHandle {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

/// One formal parameter, excluding the receiver.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamInfo {
    /// 0-based position
    pub index: usize,
    /// Name recovered from the signature, if any
    pub name: Option<String>,
    pub value_type: ValueType,
    /// The native signature declares a default
    pub has_default: bool,
    /// Language-level rest parameter
    pub native_vararg: bool,
    pub annotation: Option<KwdArg>,
}

pub type InvokeFn = dyn Fn(&dyn Any, CallArgs) -> KeywordResult<Value> + Send + Sync;

#[derive(Clone)]
pub struct MethodInfo {
    pub name: String,
    pub visibility: Visibility,
    pub is_abstract: bool,
    pub keyword: Option<Keyword>,
    /// `None` for free functions
    pub declaring_type: Option<TypeHandle>,
    pub params: Vec<ParamInfo>,
    pub source_line: Option<u32>,
    /// `None` when there is no body to call
    pub invoker: Option<Arc<InvokeFn>>,
}

impl MethodInfo {
    pub fn is_keyword(&self) -> bool {
        self.keyword.is_some()
    }

    pub fn is_public(&self) -> bool {
        self.visibility == Visibility::Public
    }
}

impl fmt::Debug for MethodInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodInfo")
            .field("name", &self.name)
            .field("visibility", &self.visibility)
            .field("is_abstract", &self.is_abstract)
            .field("keyword", &self.keyword)
            .field("declaring_type", &self.declaring_type)
            .field("params", &self.params)
            .field("source_line", &self.source_line)
            .field("has_invoker", &self.invoker.is_some())
            .finish()
    }
}

/// Implemented by types whose methods are exposed as keywords.
pub trait KeywordClass: Any + Send + Sync {
    fn type_handle() -> TypeHandle
    where
        Self: Sized,
    {
        TypeHandle::of::<Self>()
    }

    /// Every method of the type, keyword or not.
    fn methods() -> Vec<MethodInfo>
    where
        Self: Sized;
}
