//! The template root and its two-phase lifecycle

use std::cell::OnceCell;

use thiserror::Error;
use uuid::Uuid;

use crate::component::{ChildPolicy, Component, ComponentKind, ValidationMode};
use crate::error::ComponentError;
use crate::field::Field;

/// Errors raised by template identity and lifecycle operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TemplateError {
    /// Ids are assigned once and never overwritten
    #[error("template id is already set to {existing}; cannot overwrite it")]
    IdAlreadySet { existing: Uuid },

    #[error("template id cannot be the nil uuid")]
    NilId,

    /// The Definition to Populated transition happens exactly once
    #[error("template is already in populated mode")]
    AlreadyPopulated,

    #[error(transparent)]
    Component(#[from] ComponentError),
}

/// Lifecycle phase of a [`Template`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TemplateMode {
    /// Structure is being built; validation checks structure and identity
    #[default]
    Definition,
    /// Data has been applied; validation checks content
    Populated,
}

/// A root component with an identity and a lifecycle mode.
///
/// Unlike other components, a template may hold children that themselves
/// have children.
#[derive(Debug, Clone)]
pub struct Template {
    root: Component,
    id: OnceCell<Uuid>,
    mode: TemplateMode,
}

impl Default for Template {
    fn default() -> Self {
        Self::new()
    }
}

impl Template {
    pub fn new() -> Self {
        Self {
            root: Component::new(ComponentKind::Template),
            id: OnceCell::new(),
            mode: TemplateMode::Definition,
        }
    }

    /// Create a template and assign its key in one step
    pub fn keyed(key: impl Into<String>) -> Result<Self, TemplateError> {
        let mut template = Self::new();
        template.set_key(key)?;
        Ok(template)
    }

    pub fn key(&self) -> &str {
        self.root.key()
    }

    pub fn set_key(&mut self, key: impl Into<String>) -> Result<(), TemplateError> {
        Ok(self.root.set_key(key)?)
    }

    /// Always `"Template"`
    pub fn component_type(&self) -> &str {
        self.root.component_type()
    }

    pub fn id(&self) -> Option<Uuid> {
        self.id.get().copied()
    }

    /// Assign the id. Succeeds only once, and never with the nil uuid.
    pub fn set_id(&mut self, id: Uuid) -> Result<(), TemplateError> {
        if id.is_nil() {
            return Err(TemplateError::NilId);
        }
        if let Some(existing) = self.id() {
            return Err(TemplateError::IdAlreadySet { existing });
        }
        self.id.get_or_init(|| id);
        Ok(())
    }

    pub fn mode(&self) -> TemplateMode {
        self.mode
    }

    pub fn is_populated(&self) -> bool {
        self.mode == TemplateMode::Populated
    }

    /// Switch from definition to populated mode
    pub fn mark_populated(&mut self) -> Result<(), TemplateError> {
        if self.is_populated() {
            return Err(TemplateError::AlreadyPopulated);
        }
        self.mode = TemplateMode::Populated;
        Ok(())
    }

    /// The root component, for read-only traversal
    pub fn as_component(&self) -> &Component {
        &self.root
    }

    pub fn fields(&self) -> &[Field] {
        self.root.fields()
    }

    pub fn children(&self) -> &[Component] {
        self.root.children()
    }

    pub fn field(&self, key: &str) -> Option<&Field> {
        self.root.field(key)
    }

    pub fn field_mut(&mut self, key: &str) -> Option<&mut Field> {
        self.root.field_mut(key)
    }

    pub fn child(&self, key: &str) -> Option<&Component> {
        self.root.child(key)
    }

    pub fn child_mut(&mut self, key: &str) -> Option<&mut Component> {
        self.root.child_mut(key)
    }

    /// Depth-first search including the root itself
    pub fn find_component(&self, key: &str) -> Option<&Component> {
        self.root.find_component(key)
    }

    pub fn find_component_mut(&mut self, key: &str) -> Option<&mut Component> {
        self.root.find_component_mut(key)
    }

    pub fn add_field(&mut self, field: Field) -> Result<(), TemplateError> {
        Ok(self.root.add_field(field)?)
    }

    /// Attach a child. The same checks as [`Component::add_child`] apply,
    /// except that the child may already have children.
    pub fn add_child(&mut self, child: Component) -> Result<(), TemplateError> {
        Ok(self.root.attach_child(child, ChildPolicy::Nested)?)
    }

    /// Validate according to the current mode.
    ///
    /// In definition mode the template must have an id and every component
    /// a key. In populated mode the content rules of each component apply.
    pub fn validate(&self) -> Vec<String> {
        match self.mode {
            TemplateMode::Definition => {
                let mut errors = Vec::new();
                if self.id().is_none() {
                    errors.push("Template has no assigned ID.".to_string());
                }
                errors.extend(self.root.validate(ValidationMode::Definition));
                errors
            }
            TemplateMode::Populated => self.root.validate(ValidationMode::Content),
        }
    }

    /// Validate the tree under an explicit rule set, ignoring the mode
    pub fn validate_with(&self, mode: ValidationMode) -> Vec<String> {
        self.root.validate(mode)
    }

    /// Every field in the tree as `(key-path, canonical value)`.
    ///
    /// Root fields use their bare key, all others `componentKey.fieldKey`,
    /// which is the form [`super::TemplatePopulator`] resolves.
    pub fn entries(&self) -> Vec<(String, String)> {
        let mut entries = Vec::new();
        self.root.collect_entries(None, &mut entries);
        entries
    }
}
