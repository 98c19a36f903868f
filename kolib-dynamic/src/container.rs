//! Component container
//!
//! The library does not create keyword-bearing objects itself. It asks a
//! [`ComponentContainer`] which types exist and resolves their instances on
//! demand. [`LibraryContext`] is the in-process implementation; applications
//! that already own a registry of services can implement the trait over it.

use indexmap::IndexMap;
use kolib::{KeywordClass, KeywordError, KeywordResult, MethodInfo, TypeHandle};
use once_cell::sync::OnceCell;
use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

pub type Component = Arc<dyn Any + Send + Sync>;

type Factory = dyn Fn() -> KeywordResult<Component> + Send + Sync;

/// A type known to a container, with the metadata of its methods.
#[derive(Clone)]
pub struct ComponentType {
    pub handle: TypeHandle,
    pub methods: fn() -> Vec<MethodInfo>,
}

impl ComponentType {
    pub fn of<T: KeywordClass>() -> Self {
        Self {
            handle: T::type_handle(),
            methods: T::methods,
        }
    }

    /// True when at least one public method carries a keyword annotation.
    pub fn has_keywords(&self) -> bool {
        (self.methods)()
            .iter()
            .any(|m| m.is_keyword() && m.is_public())
    }
}

impl fmt::Debug for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentType")
            .field("handle", &self.handle)
            .finish()
    }
}

pub trait ComponentContainer: Send + Sync {
    /// Every registered type, in registration order.
    fn component_types(&self) -> Vec<ComponentType>;

    /// The instance of the given type.
    fn resolve(&self, handle: &TypeHandle) -> KeywordResult<Component>;
}

enum Instance {
    Ready(Component),
    Lazy {
        factory: Box<Factory>,
        cell: OnceCell<Component>,
    },
}

struct Entry {
    component_type: ComponentType,
    instance: Instance,
}

/// Container holding singletons keyed by their type.
#[derive(Default)]
pub struct LibraryContext {
    entries: IndexMap<TypeId, Entry>,
}

impl LibraryContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a ready instance of a keyword class
    pub fn register<T: KeywordClass>(mut self, instance: T) -> Self {
        self.insert(ComponentType::of::<T>(), Instance::Ready(Arc::new(instance)));
        self
    }

    /// Register a keyword class created on first resolution
    pub fn register_lazy<T, F>(mut self, factory: F) -> Self
    where
        T: KeywordClass,
        F: Fn() -> KeywordResult<T> + Send + Sync + 'static,
    {
        let factory: Box<Factory> = Box::new(move || Ok(Arc::new(factory()?) as Component));
        self.insert(
            ComponentType::of::<T>(),
            Instance::Lazy {
                factory,
                cell: OnceCell::new(),
            },
        );
        self
    }

    /// Register a plain component without keyword metadata
    pub fn register_component<T: Any + Send + Sync>(mut self, instance: T) -> Self {
        let component_type = ComponentType {
            handle: TypeHandle::of::<T>(),
            methods: Vec::new,
        };
        self.insert(component_type, Instance::Ready(Arc::new(instance)));
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn insert(&mut self, component_type: ComponentType, instance: Instance) {
        debug!(component = %component_type.handle.name, "registering component");
        self.entries.insert(
            component_type.handle.type_id,
            Entry {
                component_type,
                instance,
            },
        );
    }
}

impl ComponentContainer for LibraryContext {
    fn component_types(&self) -> Vec<ComponentType> {
        self.entries
            .values()
            .map(|e| e.component_type.clone())
            .collect()
    }

    fn resolve(&self, handle: &TypeHandle) -> KeywordResult<Component> {
        let entry = self
            .entries
            .get(&handle.type_id)
            .ok_or_else(|| KeywordError::ComponentNotFound(handle.name.clone()))?;
        match &entry.instance {
            Instance::Ready(instance) => Ok(instance.clone()),
            Instance::Lazy { factory, cell } => cell.get_or_try_init(|| factory()).cloned(),
        }
    }
}
