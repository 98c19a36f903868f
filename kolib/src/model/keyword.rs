//! Descriptor of one keyword.
//!
//! Built once from [`MethodInfo`]; after construction it only reads its own
//! fields, so a descriptor can be shared between threads and reused for every call.

use crate::model::binding::bind_arguments;
use crate::model::call_args::CallArgs;
use crate::model::parameter::{KeywordParameterDescriptor, RobotArgument};
use crate::model::reflect::{InvokeFn, MethodInfo, TypeHandle, Visibility};
use crate::model::robot_type::RobotType;
use crate::runtime::{KeywordError, KeywordResult, Value};
use crate::text::fold_whitespace;
use indexmap::IndexMap;
use itertools::Itertools;
use once_cell::sync::OnceCell;
use std::any::Any;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

#[derive(Clone)]
pub struct KeywordDescriptor {
    name: String,
    method_name: String,
    declaring_type: TypeHandle,
    source_line: Option<u32>,
    summary: Vec<String>,
    details: Vec<String>,
    tags: Vec<String>,
    parameters: Vec<KeywordParameterDescriptor>,
    invoker: Arc<InvokeFn>,
    documentation: OnceCell<String>,
    robot_arguments: OnceCell<Vec<RobotArgument>>,
    robot_argument_types: OnceCell<IndexMap<String, RobotType>>,
}

impl KeywordDescriptor {
    pub fn new(method: &MethodInfo) -> KeywordResult<Self> {
        let keyword = method
            .keyword
            .as_ref()
            .ok_or_else(|| KeywordError::MissingKeywordAnnotation(method.name.clone()))?;

        let name = if keyword.name.trim().is_empty() {
            method.name.clone()
        } else {
            keyword.name.trim().to_string()
        };

        let declaring_type = method
            .declaring_type
            .clone()
            .ok_or_else(|| KeywordError::NotAMemberFunction(name.clone()))?;

        if method.is_abstract {
            return Err(KeywordError::AbstractKeyword(name));
        }
        if method.visibility != Visibility::Public {
            return Err(KeywordError::NotAccessible(name));
        }
        let invoker = method
            .invoker
            .clone()
            .ok_or_else(|| KeywordError::AbstractKeyword(name.clone()))?;

        let parameters = method
            .params
            .iter()
            .sorted_by_key(|p| p.index)
            .map(KeywordParameterDescriptor::new)
            .collect::<KeywordResult<Vec<_>>>()?;

        let tags = keyword
            .tags
            .iter()
            .map(|t| fold_whitespace(t))
            .filter(|t| !t.is_empty())
            .collect();

        Ok(Self {
            name,
            method_name: method.name.clone(),
            declaring_type,
            source_line: method.source_line,
            summary: keyword.doc_summary.clone(),
            details: keyword.doc_details.clone(),
            tags,
            parameters,
            invoker,
            documentation: OnceCell::new(),
            robot_arguments: OnceCell::new(),
            robot_argument_types: OnceCell::new(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn method_name(&self) -> &str {
        &self.method_name
    }

    pub fn declaring_type(&self) -> &TypeHandle {
        &self.declaring_type
    }

    pub fn source_line(&self) -> Option<u32> {
        self.source_line
    }

    pub fn parameters(&self) -> &[KeywordParameterDescriptor] {
        &self.parameters
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Summary, details and the parameter block, separated by a blank line.
    /// Empty sections are left out.
    pub fn documentation(&self) -> &str {
        self.documentation.get_or_init(|| {
            let summary = self
                .summary
                .iter()
                .map(|l| l.trim())
                .filter(|l| !l.is_empty())
                .join(" ");
            let details = self.details.iter().map(|l| l.trim()).join("\n").trim().to_string();
            let parameters = if self.parameters.is_empty() {
                String::new()
            } else {
                format!(
                    "*Parameters*\n\n{}",
                    self.parameters.iter().map(|p| p.documentation()).join("\n\n")
                )
            };
            [summary, details, parameters]
                .into_iter()
                .filter(|s| !s.is_empty())
                .join("\n\n")
        })
    }

    pub fn robot_arguments(&self) -> &[RobotArgument] {
        self.robot_arguments
            .get_or_init(|| self.parameters.iter().map(|p| p.robot_argument()).collect())
    }

    pub fn robot_argument_types(&self) -> &IndexMap<String, RobotType> {
        self.robot_argument_types.get_or_init(|| {
            self.parameters
                .iter()
                .map(|p| (p.name().to_string(), RobotType::from(p.value_type())))
                .collect()
        })
    }

    /// Reconciles and converts the supplied arguments into declaration order.
    pub fn prepare_call(
        &self,
        args: Vec<Value>,
        kwargs: IndexMap<String, Value>,
    ) -> KeywordResult<CallArgs> {
        let mut bound = bind_arguments(&self.parameters, args, kwargs).map_err(|errors| {
            KeywordError::ArgumentMapping {
                keyword: self.name.clone(),
                errors,
            }
        })?;

        let mut slots = Vec::with_capacity(self.parameters.len());
        for param in &self.parameters {
            let slot = match bound.swap_remove(param.name()).flatten() {
                Some(raw) => Some(param.convert_to_target_type(Some(raw)).map_err(|source| {
                    KeywordError::ArgumentConversion {
                        keyword: self.name.clone(),
                        parameter: param.name().to_string(),
                        source,
                    }
                })?),
                None => None,
            };
            slots.push((param.name().to_string(), slot));
        }
        Ok(CallArgs::new(&self.name, slots))
    }

    /// Calls the keyword on `receiver`.
    pub fn invoke(
        &self,
        receiver: &dyn Any,
        args: Vec<Value>,
        kwargs: IndexMap<String, Value>,
    ) -> KeywordResult<Value> {
        debug!(
            keyword = %self.name,
            positional = args.len(),
            named = kwargs.len(),
            "invoking keyword"
        );
        let call_args = self.prepare_call(args, kwargs)?;
        (self.invoker)(receiver, call_args)
    }
}

impl fmt::Debug for KeywordDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeywordDescriptor")
            .field("name", &self.name)
            .field("declaring_type", &self.declaring_type.name)
            .field("parameters", &self.parameters)
            .field("tags", &self.tags)
            .finish()
    }
}
