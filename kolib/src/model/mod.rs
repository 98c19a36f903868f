//! Keyword and parameter descriptors.
//!
//! Descriptors are built once from the metadata a [`KeywordClass`] publishes and
//! then drive every call: reconciliation in [`binding`], conversion in
//! [`parameter`], invocation through [`KeywordDescriptor::invoke`].

pub mod annotation;
pub mod binding;
pub mod call_args;
pub mod keyword;
pub mod parameter;
pub mod reflect;
pub mod robot_type;

pub use annotation::{Keyword, KwdArg, ParameterKind};
pub use binding::{bind_arguments, BoundParams};
pub use call_args::CallArgs;
pub use keyword::KeywordDescriptor;
pub use parameter::{convert_value, KeywordParameterDescriptor, RobotArgument};
pub use reflect::{InvokeFn, KeywordClass, MethodInfo, ParamInfo, TypeHandle, Visibility};
pub use robot_type::RobotType;
