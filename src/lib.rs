//! Content Model - typed content trees populated from flat documents
//!
//! This library models page content as a tree of components holding typed
//! fields, assembled into templates, validated, and populated from
//! key/value documents.
//!
//! # Example
//!
//! ```rust
//! use content_model::load;
//!
//! let template = load(
//!     r#"
//!     key = "home"
//!     [[components]]
//!     key = "article"
//!     type = "ArticleComponent"
//!     "#,
//!     r#"
//!     [values]
//!     "article.title" = "Hello"
//!     title = "Home"
//!     "#,
//! )
//! .unwrap();
//!
//! assert!(template.is_populated());
//! assert!(template.validate().is_empty());
//! ```

pub mod component;
pub mod definition;
pub mod document;
pub mod error;
pub mod field;
pub mod repository;
pub mod template;

pub use component::{Component, ComponentFactory, ComponentKind, ComponentRegistry, ValidationMode};
pub use definition::{DefinitionError, TemplateLoader};
pub use document::{Document, DocumentError, DocumentSource, WebpageDocument};
pub use error::{ComponentError, FieldError};
pub use field::{Field, FieldFactory, FieldKind, FieldRegistry, FieldValue};
pub use repository::{Identified, MemoryRepository, Repository, RepositoryError};
pub use template::{
    PopulateError, PopulatorConfig, Template, TemplateError, TemplateMode, TemplatePopulator,
};

use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur during the load pipeline
#[derive(Debug, Error)]
pub enum ContentError {
    /// Error while reading a definition
    #[error("definition error: {0}")]
    Definition(#[from] DefinitionError),

    /// Error while applying document values
    #[error("populate error: {0}")]
    Populate(#[from] PopulateError),

    /// The document names a different template than the one supplied
    #[error("document targets template {document} but template {template} was supplied")]
    TemplateMismatch { document: Uuid, template: Uuid },

    /// Validation failures
    #[error("validation errors: {}", .0.join("; "))]
    Invalid(Vec<String>),
}

impl From<Vec<String>> for ContentError {
    fn from(errors: Vec<String>) -> Self {
        ContentError::Invalid(errors)
    }
}

/// Configuration for the complete load pipeline
#[derive(Debug, Default)]
pub struct ContentConfig {
    /// Population behavior
    pub populator: PopulatorConfig,
    /// Field type names available to definitions
    pub fields: FieldRegistry,
    /// Component type names available to definitions
    pub components: ComponentRegistry,
}

impl ContentConfig {
    /// Create a new configuration with the built-in registries
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_populator(mut self, config: PopulatorConfig) -> Self {
        self.populator = config;
        self
    }

    pub fn with_fields(mut self, fields: FieldRegistry) -> Self {
        self.fields = fields;
        self
    }

    pub fn with_components(mut self, components: ComponentRegistry) -> Self {
        self.components = components;
        self
    }

    fn loader(&self) -> TemplateLoader<'_> {
        TemplateLoader::new(&self.fields, &self.components)
    }
}

/// Load a template definition and populate it from a document definition,
/// both TOML, with default configuration.
///
/// The returned template is in populated mode; call
/// [`Template::validate`] to check its content.
pub fn load(template_source: &str, document_source: &str) -> Result<Template, ContentError> {
    load_with_config(template_source, document_source, &ContentConfig::default())
}

/// Load and populate with custom configuration
///
/// # Example
///
/// ```rust
/// use content_model::{load_with_config, ContentConfig, PopulatorConfig};
///
/// let config = ContentConfig::new()
///     .with_populator(PopulatorConfig::new().with_metadata_fallback(false));
///
/// let template = load_with_config("key = \"t\"", "[values]\ntitle = \"x\"", &config).unwrap();
/// assert!(template.children().is_empty());
/// ```
pub fn load_with_config(
    template_source: &str,
    document_source: &str,
    config: &ContentConfig,
) -> Result<Template, ContentError> {
    let mut template = config.loader().from_str(template_source)?;
    let document = definition::document_from_str(document_source)?;

    if let (Some(expected), Some(actual)) = (document.template_id(), template.id()) {
        if expected != actual {
            return Err(ContentError::TemplateMismatch {
                document: expected,
                template: actual,
            });
        }
    }

    TemplatePopulator::with_config(config.populator.clone()).populate(&mut template, &document)?;
    Ok(template)
}

/// Load a template definition and check it in definition mode
pub fn check(template_source: &str, config: &ContentConfig) -> Result<Template, ContentError> {
    let template = config.loader().from_str(template_source)?;
    let errors = template.validate();
    if !errors.is_empty() {
        return Err(errors.into());
    }
    Ok(template)
}

/// Render the flattened tree, one `path = "value"` line per field
pub fn format_entries(template: &Template) -> String {
    template
        .entries()
        .iter()
        .map(|(path, value)| format!("{path} = {value:?}\n"))
        .collect()
}
