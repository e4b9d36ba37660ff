//! Components: keyed nodes owning fields and child components
//!
//! A component enforces its structural invariants on every mutation:
//! field keys and child keys are unique ignoring case, a child never shares
//! its parent's type, and a child is validated before it is attached.
//! Only a template root may hold children that have children of their own;
//! that policy is applied by [`crate::template::Template`].

mod kinds;
mod registry;

pub use kinds::ComponentKind;
pub use registry::{ComponentFactory, ComponentRegistry};

use std::cell::OnceCell;

use crate::error::ComponentError;
use crate::field::{keys_match, Field};

/// Which rule set [`Component::validate`] applies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValidationMode {
    /// Structure only: keys present, ids set
    #[default]
    Definition,
    /// Populated data: required content present
    Content,
}

/// Whether a child that already has children may be attached
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ChildPolicy {
    Flat,
    Nested,
}

#[derive(Debug, Clone)]
pub struct Component {
    key: OnceCell<String>,
    kind: ComponentKind,
    fields: Vec<Field>,
    children: Vec<Component>,
}

impl Component {
    /// Create an unkeyed component with the default fields of `kind`
    pub fn new(kind: ComponentKind) -> Self {
        let fields = kind.default_fields();
        Self {
            key: OnceCell::new(),
            kind,
            fields,
            children: Vec::new(),
        }
    }

    /// Create a component and assign its key in one step
    pub fn keyed(kind: ComponentKind, key: impl Into<String>) -> Result<Self, ComponentError> {
        let mut component = Self::new(kind);
        component.set_key(key)?;
        Ok(component)
    }

    /// A component of a caller-defined type with no fields
    pub fn custom(component_type: impl Into<String>) -> Self {
        Self::new(ComponentKind::Custom(component_type.into()))
    }

    pub fn article() -> Self {
        Self::new(ComponentKind::Article)
    }

    pub fn metadata() -> Self {
        Self::new(ComponentKind::Metadata)
    }

    pub fn markdown() -> Self {
        Self::new(ComponentKind::Markdown)
    }

    pub fn text() -> Self {
        Self::new(ComponentKind::Text)
    }

    /// The key, or `""` while unset
    pub fn key(&self) -> &str {
        self.key.get().map_or("", String::as_str)
    }

    pub fn has_key(&self) -> bool {
        self.key.get().is_some()
    }

    /// Assign the key. Succeeds only once.
    pub fn set_key(&mut self, key: impl Into<String>) -> Result<(), ComponentError> {
        let key = key.into();
        if key.is_empty() {
            return Err(ComponentError::EmptyKey);
        }
        self.key.set(key).map_err(|_| ComponentError::KeyAlreadySet {
            existing: self.key().to_string(),
        })
    }

    pub(crate) fn matches_key(&self, key: &str) -> bool {
        self.key.get().is_some_and(|own| keys_match(own, key))
    }

    pub fn kind(&self) -> &ComponentKind {
        &self.kind
    }

    /// The type tag, e.g. `"ArticleComponent"`
    pub fn component_type(&self) -> &str {
        self.kind.as_str()
    }

    /// Owned fields in insertion order
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Child components in insertion order
    pub fn children(&self) -> &[Component] {
        &self.children
    }

    /// Look up an owned field, ignoring case
    pub fn field(&self, key: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.matches_key(key))
    }

    pub fn field_mut(&mut self, key: &str) -> Option<&mut Field> {
        self.fields.iter_mut().find(|f| f.matches_key(key))
    }

    /// Look up a direct child, ignoring case
    pub fn child(&self, key: &str) -> Option<&Component> {
        self.children.iter().find(|c| c.matches_key(key))
    }

    pub fn child_mut(&mut self, key: &str) -> Option<&mut Component> {
        self.children.iter_mut().find(|c| c.matches_key(key))
    }

    /// Depth-first search for a component keyed `key`, starting with `self`
    pub fn find_component(&self, key: &str) -> Option<&Component> {
        if self.matches_key(key) {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find_component(key))
    }

    pub fn find_component_mut(&mut self, key: &str) -> Option<&mut Component> {
        if self.matches_key(key) {
            return Some(self);
        }
        self.children
            .iter_mut()
            .find_map(|c| c.find_component_mut(key))
    }

    /// Add a field. Fails if the field has no key, or if a field with the
    /// same key (ignoring case) already exists.
    pub fn add_field(&mut self, field: Field) -> Result<(), ComponentError> {
        if !field.has_key() {
            return Err(ComponentError::UnkeyedField {
                field_type: field.field_type(),
            });
        }
        if self.field(field.key()).is_some() {
            return Err(ComponentError::DuplicateField {
                key: field.key().to_string(),
            });
        }
        self.fields.push(field);
        Ok(())
    }

    /// Builder form of [`Component::add_field`]
    pub fn with_field(mut self, field: Field) -> Result<Self, ComponentError> {
        self.add_field(field)?;
        Ok(self)
    }

    /// Attach a child component.
    ///
    /// Checks, in order: the child validates cleanly in definition mode, its
    /// key is not taken, its type differs from ours, and it has no children
    /// of its own. Nothing is attached unless every check passes.
    pub fn add_child(&mut self, child: Component) -> Result<(), ComponentError> {
        self.attach_child(child, ChildPolicy::Flat)
    }

    pub(crate) fn attach_child(
        &mut self,
        child: Component,
        policy: ChildPolicy,
    ) -> Result<(), ComponentError> {
        let errors = child.validate(ValidationMode::Definition);
        if !errors.is_empty() {
            return Err(ComponentError::InvalidChild {
                key: child.key().to_string(),
                errors,
            });
        }

        if self.child(child.key()).is_some() {
            return Err(ComponentError::DuplicateChild {
                key: child.key().to_string(),
            });
        }

        if keys_match(self.component_type(), child.component_type()) {
            return Err(ComponentError::SameType {
                component_type: child.component_type().to_string(),
            });
        }

        if policy == ChildPolicy::Flat && !child.children.is_empty() {
            return Err(ComponentError::NestedChild {
                key: child.key().to_string(),
            });
        }

        self.children.push(child);
        Ok(())
    }

    /// Collect every violation in this subtree.
    ///
    /// Own errors come first, then each child's errors in insertion order.
    /// An empty list means the subtree is valid.
    pub fn validate(&self, mode: ValidationMode) -> Vec<String> {
        let mut errors = Vec::new();
        if !self.has_key() {
            errors.push(format!(
                "Component of type '{}' has no Key set.",
                self.component_type()
            ));
        }
        errors.extend(self.kind.content_errors(self, mode));
        for child in &self.children {
            errors.extend(child.validate(mode));
        }
        errors
    }

    /// Flattened `(key-path, value)` pairs for this subtree.
    ///
    /// Fields of `self` are addressed by `prefix` (bare keys when `None`),
    /// fields of descendants by `childKey.fieldKey`.
    pub(crate) fn collect_entries(&self, prefix: Option<&str>, out: &mut Vec<(String, String)>) {
        for field in &self.fields {
            let path = match prefix {
                Some(p) => format!("{p}.{}", field.key()),
                None => field.key().to_string(),
            };
            out.push((path, field.value()));
        }
        for child in &self.children {
            child.collect_entries(Some(child.key()), out);
        }
    }
}
