//! Lookup of component constructors by type name

use std::collections::HashMap;

use super::{Component, ComponentKind};

/// Creates components from a type name such as `"ArticleComponent"`
pub trait ComponentFactory {
    fn create_component(&self, type_name: &str) -> Option<Component>;
}

type ComponentConstructor = Box<dyn Fn() -> Component + Send + Sync>;

pub struct ComponentRegistry {
    constructors: HashMap<String, ComponentConstructor>,
}

impl std::fmt::Debug for ComponentRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComponentRegistry")
            .field("types", &self.type_names())
            .finish()
    }
}

impl Default for ComponentRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl ComponentRegistry {
    pub fn empty() -> Self {
        Self {
            constructors: HashMap::new(),
        }
    }

    /// Article, metadata, markdown and text components
    pub fn with_builtins() -> Self {
        let mut registry = Self::empty();
        for kind in [
            ComponentKind::Article,
            ComponentKind::Metadata,
            ComponentKind::Markdown,
            ComponentKind::Text,
        ] {
            let name = kind.as_str().to_string();
            registry.register(name, move || Component::new(kind.clone()));
        }
        registry
    }

    /// Register a constructor, replacing any entry with the same name
    pub fn register<F>(&mut self, type_name: impl Into<String>, constructor: F)
    where
        F: Fn() -> Component + Send + Sync + 'static,
    {
        self.constructors
            .insert(type_name.into().to_lowercase(), Box::new(constructor));
    }

    /// Register a field-less component type whose tag is `type_name`
    pub fn register_custom(&mut self, type_name: impl Into<String>) {
        let type_name = type_name.into();
        let tag = type_name.clone();
        self.register(type_name, move || Component::custom(tag.clone()));
    }

    pub fn contains(&self, type_name: &str) -> bool {
        self.constructors.contains_key(&type_name.to_lowercase())
    }

    pub fn type_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.constructors.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl ComponentFactory for ComponentRegistry {
    fn create_component(&self, type_name: &str) -> Option<Component> {
        let name = type_name.trim();
        if name.is_empty() {
            return None;
        }
        self.constructors
            .get(&name.to_lowercase())
            .map(|constructor| constructor())
    }
}
