//! Declarative TOML definitions for templates and documents
//!
//! A template definition names every field and component by its registered
//! type name:
//!
//! ```toml
//! key = "home"
//! id = "6f1c2a0e-8d4b-4f7e-9a51-0c3d2b1e4f5a"
//!
//! [[fields]]
//! key = "pageTitle"
//! type = "TextField"
//!
//! [[components]]
//! key = "article"
//! type = "ArticleComponent"
//!
//! [[components.fields]]
//! key = "published"
//! type = "DateField"
//! ```
//!
//! A document definition carries raw values by key-path. Nested tables are
//! flattened, so `[values.article] title = "x"` and
//! `[values] "article.title" = "x"` are the same entry.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use crate::component::{Component, ComponentFactory};
use crate::document::{DocumentError, WebpageDocument};
use crate::error::{ComponentError, FieldError};
use crate::field::{Field, FieldFactory};
use crate::template::{Template, TemplateError};

/// Errors that can occur when loading definitions
#[derive(Error, Debug)]
pub enum DefinitionError {
    #[error("Failed to read definition file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse definition TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("unknown field type '{type_name}' for field '{key}'")]
    UnknownFieldType { key: String, type_name: String },

    #[error("unknown component type '{type_name}' for component '{key}'")]
    UnknownComponentType { key: String, type_name: String },

    #[error("invalid id '{value}': {source}")]
    InvalidId {
        value: String,
        #[source]
        source: uuid::Error,
    },

    /// Document values must be scalars
    #[error("value at '{path}' must be a string, number, boolean or datetime")]
    UnsupportedValue { path: String },

    #[error("field '{key}': {source}")]
    Field {
        key: String,
        #[source]
        source: FieldError,
    },

    #[error(transparent)]
    Component(#[from] ComponentError),

    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error(transparent)]
    Document(#[from] DocumentError),
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct TomlTemplate {
    key: String,
    id: Option<String>,
    #[serde(default)]
    fields: Vec<TomlField>,
    #[serde(default)]
    components: Vec<TomlComponent>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct TomlField {
    key: String,
    #[serde(rename = "type")]
    type_name: String,
    /// Initial raw value, parsed like any other write
    value: Option<String>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct TomlComponent {
    key: String,
    #[serde(rename = "type")]
    type_name: String,
    #[serde(default)]
    fields: Vec<TomlField>,
    #[serde(default)]
    components: Vec<TomlComponent>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct TomlDocument {
    id: Option<String>,
    template_id: Option<String>,
    #[serde(default)]
    values: toml::Table,
}

/// Builds templates from TOML through injected type lookups
pub struct TemplateLoader<'a> {
    fields: &'a dyn FieldFactory,
    components: &'a dyn ComponentFactory,
}

impl<'a> TemplateLoader<'a> {
    pub fn new(fields: &'a dyn FieldFactory, components: &'a dyn ComponentFactory) -> Self {
        Self { fields, components }
    }

    /// Load a template definition from a TOML file
    pub fn from_file(&self, path: &Path) -> Result<Template, DefinitionError> {
        let content = std::fs::read_to_string(path)?;
        self.from_str(&content)
    }

    /// Load a template definition from a TOML string
    pub fn from_str(&self, content: &str) -> Result<Template, DefinitionError> {
        let parsed: TomlTemplate = toml::from_str(content)?;

        let mut template = Template::keyed(parsed.key)?;
        if let Some(id) = parsed.id {
            template.set_id(parse_id(&id)?)?;
        }
        for spec in &parsed.fields {
            template.add_field(self.build_field(spec)?)?;
        }
        for spec in &parsed.components {
            template.add_child(self.build_component(spec)?)?;
        }

        debug!(
            key = template.key(),
            fields = template.fields().len(),
            components = template.children().len(),
            "template definition loaded"
        );
        Ok(template)
    }

    fn build_field(&self, spec: &TomlField) -> Result<Field, DefinitionError> {
        let mut field = self.fields.create_field(&spec.type_name).ok_or_else(|| {
            DefinitionError::UnknownFieldType {
                key: spec.key.clone(),
                type_name: spec.type_name.clone(),
            }
        })?;
        let field_error = |source| DefinitionError::Field {
            key: spec.key.clone(),
            source,
        };
        field.set_key(spec.key.as_str()).map_err(field_error)?;
        if let Some(value) = &spec.value {
            field.set_value(Some(value.as_str())).map_err(field_error)?;
        }
        Ok(field)
    }

    fn build_component(&self, spec: &TomlComponent) -> Result<Component, DefinitionError> {
        let mut component = self
            .components
            .create_component(&spec.type_name)
            .ok_or_else(|| DefinitionError::UnknownComponentType {
                key: spec.key.clone(),
                type_name: spec.type_name.clone(),
            })?;
        component.set_key(spec.key.as_str())?;

        for field_spec in &spec.fields {
            let field = self.build_field(field_spec)?;
            let redeclared = component
                .field(field.key())
                .is_some_and(|existing| existing.kind() == field.kind());
            if !redeclared {
                component.add_field(field)?;
                continue;
            }
            // a field the kind already owns only takes the declared value
            if let (Some(existing), Some(value)) =
                (component.field_mut(field.key()), &field_spec.value)
            {
                existing
                    .set_value(Some(value.as_str()))
                    .map_err(|source| DefinitionError::Field {
                        key: field_spec.key.clone(),
                        source,
                    })?;
            }
        }
        for child in &spec.components {
            component.add_child(self.build_component(child)?)?;
        }
        Ok(component)
    }
}

/// Load a document definition from a TOML file
pub fn document_from_file(path: &Path) -> Result<WebpageDocument, DefinitionError> {
    let content = std::fs::read_to_string(path)?;
    document_from_str(&content)
}

/// Load a document definition from a TOML string
pub fn document_from_str(content: &str) -> Result<WebpageDocument, DefinitionError> {
    let parsed: TomlDocument = toml::from_str(content)?;

    let mut page = WebpageDocument::new();
    if let Some(id) = parsed.id {
        page.document_mut().set_id(parse_id(&id)?)?;
    }
    if let Some(template_id) = parsed.template_id {
        page.set_template_id(Some(parse_id(&template_id)?));
    }

    let mut values = BTreeMap::new();
    flatten_values(None, &parsed.values, &mut values)?;
    for (path, value) in values {
        page.document_mut().insert(path, value);
    }
    Ok(page)
}

fn parse_id(value: &str) -> Result<Uuid, DefinitionError> {
    Uuid::parse_str(value.trim()).map_err(|source| DefinitionError::InvalidId {
        value: value.to_string(),
        source,
    })
}

fn flatten_values(
    prefix: Option<&str>,
    table: &toml::Table,
    out: &mut BTreeMap<String, String>,
) -> Result<(), DefinitionError> {
    for (key, value) in table {
        let path = match prefix {
            Some(p) => format!("{p}.{key}"),
            None => key.clone(),
        };
        let text = match value {
            toml::Value::Table(nested) => {
                flatten_values(Some(&path), nested, out)?;
                continue;
            }
            toml::Value::Array(_) => return Err(DefinitionError::UnsupportedValue { path }),
            toml::Value::String(s) => s.clone(),
            toml::Value::Integer(n) => n.to_string(),
            toml::Value::Float(x) => x.to_string(),
            toml::Value::Boolean(b) => b.to_string(),
            toml::Value::Datetime(dt) => dt.to_string(),
        };
        out.insert(path, text);
    }
    Ok(())
}
