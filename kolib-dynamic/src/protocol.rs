//! Dynamic library protocol
//!
//! One trait per capability of the Robot Framework dynamic library API. A library
//! must implement [`MinimalDynamicLibrary`]; the others are optional and let the
//! engine validate arguments, coerce types and render documentation.

use indexmap::IndexMap;
use kolib::{KeywordResult, RobotArgument, RobotType, Value};

/// Name of the library-level introduction in `get_keyword_documentation`.
pub const INTRO: &str = "__intro__";
/// Name of the library-level usage documentation in `get_keyword_documentation`.
pub const INIT: &str = "__init__";

pub trait MinimalDynamicLibrary {
    /// All keyword names exposed by the library.
    fn get_keyword_names(&self) -> Vec<String>;

    /// Runs a keyword with positional arguments only. `Value::Nil` stands for no result.
    fn run_keyword(&self, name: &str, args: Vec<Value>) -> KeywordResult<Value>;
}

/// Named-argument variant of `run_keyword`; preferred by the engine when present.
pub trait KwArgsSupport: MinimalDynamicLibrary {
    fn run_keyword_with_kwargs(
        &self,
        name: &str,
        args: Vec<Value>,
        kwargs: IndexMap<String, Value>,
    ) -> KeywordResult<Value>;
}

pub trait ArgumentSpecSupport {
    /// Parameter names, prefixed with `*` or `**` for collectors, plus defaults.
    fn get_keyword_arguments(&self, name: &str) -> KeywordResult<Vec<RobotArgument>>;
}

pub trait ArgumentTypesSupport {
    fn get_keyword_types(&self, name: &str) -> KeywordResult<IndexMap<String, RobotType>>;
}

pub trait LibdocSupport {
    /// Documentation of a keyword, or of the library for [`INTRO`] and [`INIT`].
    fn get_keyword_documentation(&self, name: &str) -> KeywordResult<String>;
}

pub trait SourceSupport {
    /// `<path>[:<line>]` of the keyword's declaring type, if known.
    fn get_keyword_source(&self, name: &str) -> KeywordResult<Option<String>>;
}

pub trait TagSupport {
    fn get_keyword_tags(&self, _name: &str) -> KeywordResult<Vec<String>> {
        Ok(Vec::new())
    }
}
