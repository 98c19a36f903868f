use crate::model::{
    CallArgs, InvokeFn, Keyword, KwdArg, MethodInfo, ParamInfo, TypeHandle, Visibility,
};
use crate::runtime::{KeywordError, KeywordResult, Value, ValueType};
use std::any::Any;
use std::sync::Arc;

/// Fluent interface builder for [`MethodInfo`]
#[derive(Clone)]
pub struct MethodBuilder {
    name: String,
    visibility: Visibility,
    is_abstract: bool,
    keyword: Option<Keyword>,
    declaring_type: Option<TypeHandle>,
    params: Vec<ParamBuilder>,
    source_line: Option<u32>,
    invoker: Option<Arc<InvokeFn>>,
}

impl MethodBuilder {
    /// A free function, not declared by any type
    pub fn function(name: &str) -> Self {
        Self {
            name: name.to_string(),
            visibility: Visibility::Public,
            is_abstract: false,
            keyword: None,
            declaring_type: None,
            params: Vec::new(),
            source_line: None,
            invoker: None,
        }
    }

    /// A method declared by `T`
    pub fn member_of<T: Any>(name: &str) -> Self {
        Self::function(name).with_declaring_type(TypeHandle::of::<T>())
    }

    pub fn with_declaring_type(mut self, handle: TypeHandle) -> Self {
        self.declaring_type = Some(handle);
        self
    }

    /// Mark the method as keyword
    pub fn with_keyword(mut self, keyword: Keyword) -> Self {
        self.keyword = Some(keyword);
        self
    }

    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    /// Declare the method without a body
    pub fn abstract_method(mut self) -> Self {
        self.is_abstract = true;
        self.invoker = None;
        self
    }

    /// Append a parameter; positions follow the order of the calls
    pub fn with_param(mut self, param: ParamBuilder) -> Self {
        self.params.push(param);
        self
    }

    pub fn with_source_line(mut self, line: u32) -> Self {
        self.source_line = Some(line);
        self
    }

    /// Set the body. The receiver is downcast to `T` before `body` runs.
    pub fn with_invoker<T, F>(mut self, body: F) -> Self
    where
        T: Any,
        F: Fn(&T, CallArgs) -> KeywordResult<Value> + Send + Sync + 'static,
    {
        let keyword = self.name.clone();
        let expected = TypeHandle::of::<T>().name;
        self.invoker = Some(Arc::new(move |receiver: &dyn Any, args: CallArgs| {
            let this = receiver
                .downcast_ref::<T>()
                .ok_or_else(|| KeywordError::ReceiverMismatch {
                    keyword: keyword.clone(),
                    expected: expected.clone(),
                })?;
            body(this, args)
        }));
        self
    }

    pub fn build(self) -> MethodInfo {
        MethodInfo {
            name: self.name,
            visibility: self.visibility,
            is_abstract: self.is_abstract,
            keyword: self.keyword,
            declaring_type: self.declaring_type,
            params: self
                .params
                .into_iter()
                .enumerate()
                .map(|(index, p)| p.build(index))
                .collect(),
            source_line: self.source_line,
            invoker: self.invoker,
        }
    }
}

/// Fluent interface builder for [`ParamInfo`]
#[derive(Debug, Clone)]
pub struct ParamBuilder {
    name: Option<String>,
    value_type: ValueType,
    has_default: bool,
    native_vararg: bool,
    annotation: Option<KwdArg>,
}

impl ParamBuilder {
    pub fn new(name: &str, value_type: ValueType) -> Self {
        Self {
            name: Some(name.to_string()),
            ..Self::unnamed(value_type)
        }
    }

    /// A parameter whose name was not retained
    pub fn unnamed(value_type: ValueType) -> Self {
        Self {
            name: None,
            value_type,
            has_default: false,
            native_vararg: false,
            annotation: None,
        }
    }

    /// The native signature declares a default, so the parameter may be omitted
    pub fn with_default(mut self) -> Self {
        self.has_default = true;
        self
    }

    pub fn native_vararg(mut self) -> Self {
        self.native_vararg = true;
        self
    }

    pub fn with_kwd_arg(mut self, annotation: KwdArg) -> Self {
        self.annotation = Some(annotation);
        self
    }

    pub fn build(self, index: usize) -> ParamInfo {
        ParamInfo {
            index,
            name: self.name,
            value_type: self.value_type,
            has_default: self.has_default,
            native_vararg: self.native_vararg,
            annotation: self.annotation,
        }
    }
}
