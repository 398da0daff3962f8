//! Name to renderer-factory table.
//!
//! Renderers are contributed by plugins. Each plugin adds its factories to a
//! [`RendererRegistry`]; when two plugins register the same name, the one
//! registered last is used. The registry is immutable once handed to the
//! compiler and can be shared between threads.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use quizmd_kvparser::Attributes;

use crate::error::Result;
use crate::renderer::{Renderer, RendererFactory};

/// A set of renderers contributed together.
pub trait RendererPlugin {
    fn register(&self, registry: &mut RendererRegistry);
}

/// Renderer factories keyed by entity name.
#[derive(Clone, Default)]
pub struct RendererRegistry {
    factories: BTreeMap<String, RendererFactory>,
}

impl RendererRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a registry from plugins, in order.
    pub fn from_plugins(plugins: &[&dyn RendererPlugin]) -> Self {
        let mut registry = Self::new();
        for plugin in plugins {
            registry.add_plugin(*plugin);
        }
        registry
    }

    /// Registers a factory, replacing any earlier one under `name`.
    pub fn register<F>(&mut self, name: impl Into<String>, factory: F) -> &mut Self
    where
        F: Fn(&Attributes) -> Result<Box<dyn Renderer>> + Send + Sync + 'static,
    {
        let name = name.into();
        if self.factories.insert(name.clone(), Arc::new(factory)).is_some() {
            tracing::debug!(name, "renderer replaced by a later registration");
        }
        self
    }

    /// Lets a plugin register its renderers.
    pub fn add_plugin(&mut self, plugin: &dyn RendererPlugin) -> &mut Self {
        plugin.register(self);
        self
    }

    /// Copies every entry of `other` into `self`. Entries of `other` win.
    pub fn merge(&mut self, other: &RendererRegistry) -> &mut Self {
        for (name, factory) in &other.factories {
            self.factories.insert(name.clone(), Arc::clone(factory));
        }
        self
    }

    pub fn get(&self, name: &str) -> Option<&RendererFactory> {
        self.factories.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

impl fmt::Debug for RendererRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.names()).finish()
    }
}
