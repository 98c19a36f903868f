//! Keyword registry and dynamic library facade.
//!
//! # Rules:
//! - Keywords are discovered on first access: every component type with at
//!   least one public keyword method contributes one descriptor per keyword
//!   method. The result is cached and never rebuilt.
//! - A method whose descriptor cannot be built is skipped with a warning; the
//!   other keywords of the component stay available.
//! - When two methods claim the same keyword name the first one discovered wins.
//! - `__intro__` and `__init__` resolve to library documentation, never to a
//!   keyword.

use crate::config::{LibraryConfig, LibraryScope};
use crate::container::ComponentContainer;
use crate::logging::init_logging;
use crate::protocol::{
    ArgumentSpecSupport, ArgumentTypesSupport, KwArgsSupport, LibdocSupport,
    MinimalDynamicLibrary, SourceSupport, TagSupport, INIT, INTRO,
};
use indexmap::IndexMap;
use kolib::{KeywordDescriptor, KeywordError, KeywordResult, RobotArgument, RobotType, Value};
use once_cell::sync::OnceCell;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub struct DynamicLibrary {
    container: Arc<dyn ComponentContainer>,
    config: LibraryConfig,
    keywords: OnceCell<IndexMap<String, KeywordDescriptor>>,
}

impl DynamicLibrary {
    pub fn new(container: Arc<dyn ComponentContainer>) -> Self {
        Self {
            container,
            config: LibraryConfig::default(),
            keywords: OnceCell::new(),
        }
    }

    /// Library configured from `KOLIB_CONFIG`, with logging installed.
    pub fn from_env(container: Arc<dyn ComponentContainer>) -> KeywordResult<Self> {
        let config = LibraryConfig::from_env()?;
        init_logging(config.log_filter.as_deref());
        Ok(Self::new(container).with_config(config))
    }

    pub fn with_config(mut self, config: LibraryConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &LibraryConfig {
        &self.config
    }

    pub fn scope(&self) -> LibraryScope {
        self.config.scope
    }

    /// Descriptor of a keyword by name.
    pub fn keyword(&self, name: &str) -> KeywordResult<&KeywordDescriptor> {
        self.keywords()
            .get(name)
            .ok_or_else(|| KeywordError::UnknownKeyword(name.to_string()))
    }

    fn keywords(&self) -> &IndexMap<String, KeywordDescriptor> {
        self.keywords.get_or_init(|| self.discover())
    }

    fn discover(&self) -> IndexMap<String, KeywordDescriptor> {
        let mut keywords: IndexMap<String, KeywordDescriptor> = IndexMap::new();

        for component in self.container.component_types() {
            if !component.has_keywords() {
                continue;
            }
            debug!(component = %component.handle.name, "collecting keywords");

            for method in (component.methods)() {
                if !method.is_keyword() {
                    continue;
                }
                let descriptor = match KeywordDescriptor::new(&method) {
                    Ok(descriptor) => descriptor,
                    Err(e) => {
                        warn!(
                            component = %component.handle.name,
                            method = %method.name,
                            "skipping keyword: {}",
                            e
                        );
                        continue;
                    }
                };
                if let Some(existing) = keywords.get(descriptor.name()) {
                    warn!(
                        keyword = %descriptor.name(),
                        kept = %existing.declaring_type().name,
                        skipped = %component.handle.name,
                        "duplicate keyword name"
                    );
                    continue;
                }
                keywords.insert(descriptor.name().to_string(), descriptor);
            }
        }

        info!(
            library = %self.config.name,
            count = keywords.len(),
            "keyword cache built"
        );
        keywords
    }

    fn run(
        &self,
        name: &str,
        args: Vec<Value>,
        kwargs: IndexMap<String, Value>,
    ) -> KeywordResult<Value> {
        let keyword = self.keyword(name)?;
        let receiver = self.container.resolve(keyword.declaring_type())?;
        keyword.invoke(&*receiver, args, kwargs)
    }
}

impl MinimalDynamicLibrary for DynamicLibrary {
    fn get_keyword_names(&self) -> Vec<String> {
        self.keywords().keys().cloned().collect()
    }

    fn run_keyword(&self, name: &str, args: Vec<Value>) -> KeywordResult<Value> {
        self.run(name, args, IndexMap::new())
    }
}

impl KwArgsSupport for DynamicLibrary {
    fn run_keyword_with_kwargs(
        &self,
        name: &str,
        args: Vec<Value>,
        kwargs: IndexMap<String, Value>,
    ) -> KeywordResult<Value> {
        self.run(name, args, kwargs)
    }
}

impl ArgumentSpecSupport for DynamicLibrary {
    fn get_keyword_arguments(&self, name: &str) -> KeywordResult<Vec<RobotArgument>> {
        let arguments = self.keyword(name)?.robot_arguments().to_vec();
        debug!(keyword = %name, ?arguments, "argument spec");
        Ok(arguments)
    }
}

impl ArgumentTypesSupport for DynamicLibrary {
    fn get_keyword_types(&self, name: &str) -> KeywordResult<IndexMap<String, RobotType>> {
        let types = self.keyword(name)?.robot_argument_types().clone();
        debug!(keyword = %name, ?types, "argument types");
        Ok(types)
    }
}

impl LibdocSupport for DynamicLibrary {
    fn get_keyword_documentation(&self, name: &str) -> KeywordResult<String> {
        match name {
            INTRO => Ok(self.config.intro_documentation()),
            INIT => Ok(self.config.init_documentation()),
            _ => Ok(self.keyword(name)?.documentation().to_string()),
        }
    }
}

impl SourceSupport for DynamicLibrary {
    fn get_keyword_source(&self, name: &str) -> KeywordResult<Option<String>> {
        let keyword = self.keyword(name)?;
        let source = keyword.declaring_type().source.as_ref().map(|path| {
            match keyword.source_line() {
                Some(line) => format!("{}:{}", path, line),
                None => path.clone(),
            }
        });
        Ok(source)
    }
}

impl TagSupport for DynamicLibrary {
    fn get_keyword_tags(&self, name: &str) -> KeywordResult<Vec<String>> {
        Ok(self.keyword(name)?.tags().to_vec())
    }
}
