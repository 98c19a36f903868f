// kolib
// Keyword descriptors and argument reconciliation for dynamic Robot Framework libraries

pub mod builders;
pub mod conversion;
pub mod model;
pub mod runtime;
pub mod text;

pub use builders::{MethodBuilder, ParamBuilder};
pub use conversion::{ConversionError, ConversionResult};
pub use model::{
    CallArgs, Keyword, KeywordClass, KeywordDescriptor, KeywordParameterDescriptor, KwdArg,
    MethodInfo, ParamInfo, ParameterKind, RobotArgument, RobotType, TypeHandle, Visibility,
};
pub use runtime::{
    EnumType, EnumValue, FromValue, IntoValue, KeywordError, KeywordResult, NumberKind,
    ObjectType, ObjectValue, Temporal, TemporalKind, Value, ValueType,
};
