// kolib-dynamic
// Dynamic library facade exposing kolib keywords to Robot Framework

pub mod config;
pub mod container;
pub mod library;
pub mod logging;
pub mod protocol;

pub use config::{LibraryConfig, LibraryScope};
pub use container::{ComponentContainer, ComponentType, LibraryContext};
pub use library::DynamicLibrary;
pub use protocol::{
    ArgumentSpecSupport, ArgumentTypesSupport, KwArgsSupport, LibdocSupport,
    MinimalDynamicLibrary, SourceSupport, TagSupport,
};
