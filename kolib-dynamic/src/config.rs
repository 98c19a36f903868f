//! Library configuration.
//!
//! Read from TOML. Every field has a default, so an empty file is a valid
//! configuration.
//!
//! ```toml
//! name = "Inventory"
//! version = "1.2.0"
//! scope = "SUITE"
//! intro = """
//!     Keywords for the inventory service.
//!     """
//! log_filter = "kolib=debug"
//! ```

use kolib::text::{if_not_blank, trim_as_text_block};
use kolib::{KeywordError, KeywordResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Environment variable naming the configuration file.
pub const CONFIG_ENV: &str = "KOLIB_CONFIG";

/// Lifetime of the library instance, as reported to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LibraryScope {
    /// One instance for the whole execution
    #[default]
    Global,
    /// A new instance for every test suite
    #[serde(alias = "TEST_SUITE")]
    Suite,
    /// A new instance for every test case
    #[serde(alias = "TEST_CASE")]
    Test,
    /// Alias of `Test` for RPA
    Task,
}

impl LibraryScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            LibraryScope::Global => "GLOBAL",
            LibraryScope::Suite => "SUITE",
            LibraryScope::Test => "TEST",
            LibraryScope::Task => "TASK",
        }
    }
}

impl fmt::Display for LibraryScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LibraryConfig {
    /// Library name reported to the engine
    pub name: String,
    pub version: String,
    pub scope: LibraryScope,
    /// General documentation, returned for `__intro__`
    pub intro: String,
    /// Usage documentation, returned for `__init__`
    pub init: String,
    /// `tracing` filter directives
    pub log_filter: Option<String>,
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            name: "kolib".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            scope: LibraryScope::default(),
            intro: String::new(),
            init: String::new(),
            log_filter: None,
        }
    }
}

impl LibraryConfig {
    pub fn from_toml_str(content: &str) -> KeywordResult<Self> {
        toml::from_str(content)
            .map_err(|e| KeywordError::Config(format!("Failed to parse library config: {}", e)))
    }

    /// Load configuration from file
    pub fn from_file(path: impl AsRef<Path>) -> KeywordResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            KeywordError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;
        Self::from_toml_str(&content)
    }

    /// Load the file named by [`CONFIG_ENV`], or the defaults when it is unset.
    pub fn from_env() -> KeywordResult<Self> {
        match std::env::var(CONFIG_ENV) {
            Ok(path) if !path.trim().is_empty() => Self::from_file(path.trim()),
            _ => Ok(Self::default()),
        }
    }

    pub fn intro_documentation(&self) -> String {
        if_not_blank(&self.intro, trim_as_text_block)
    }

    pub fn init_documentation(&self) -> String {
        if_not_blank(&self.init, trim_as_text_block)
    }
}
