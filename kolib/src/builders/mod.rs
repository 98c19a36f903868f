// Method metadata builders
// Fluent interfaces keyword-bearing types use to publish their methods

pub mod method_builder;

pub use method_builder::{MethodBuilder, ParamBuilder};
