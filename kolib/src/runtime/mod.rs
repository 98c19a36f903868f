//! Runtime value model
//!
//! Dynamic values exchanged with the calling engine, the declared types they are
//! checked against, and the error type shared by the whole keyword layer.

pub mod error;
pub mod types;
pub mod value_conversion;
pub mod values;

pub use error::{KeywordError, KeywordResult};
pub use types::{Constructor, EnumType, NumberKind, ObjectType, TemporalKind, ValueType};
pub use values::{EnumValue, FromValue, IntoValue, ObjectValue, Temporal, Value};
