//! Built-in component kinds and their default fields

use std::fmt;

use crate::field::{Field, FieldKind};

use super::{Component, ValidationMode};

/// The kind of a component, which fixes its `component_type` tag
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    /// `title`, `summary`, `content` and `image`
    Article,
    /// `title` and `description`; receives page-level keys during population
    Metadata,
    /// A single `content` markdown field
    Markdown,
    /// A single `text` field
    Text,
    /// The root of a template tree
    Template,
    /// A caller-defined kind with no default fields
    Custom(String),
}

impl ComponentKind {
    pub fn as_str(&self) -> &str {
        match self {
            ComponentKind::Article => "ArticleComponent",
            ComponentKind::Metadata => "MetadataComponent",
            ComponentKind::Markdown => "MarkdownComponent",
            ComponentKind::Text => "TextComponent",
            ComponentKind::Template => "Template",
            ComponentKind::Custom(name) => name,
        }
    }

    /// The fields a freshly constructed component of this kind owns
    pub(super) fn default_fields(&self) -> Vec<Field> {
        let specs: &[(&str, FieldKind)] = match self {
            ComponentKind::Article => &[
                ("title", FieldKind::Text),
                ("summary", FieldKind::Markdown),
                ("content", FieldKind::Markdown),
            ],
            ComponentKind::Metadata => &[
                ("title", FieldKind::Text),
                ("description", FieldKind::Text),
            ],
            ComponentKind::Markdown => &[("content", FieldKind::Markdown)],
            ComponentKind::Text => &[("text", FieldKind::Text)],
            ComponentKind::Template | ComponentKind::Custom(_) => &[],
        };

        let mut fields: Vec<Field> = specs
            .iter()
            .filter_map(|(key, kind)| Field::keyed(*kind, *key).ok())
            .collect();

        if *self == ComponentKind::Article {
            let mut image = Field::image();
            if image.set_key("image").is_ok() {
                fields.push(image);
            }
        }
        fields
    }

    /// Content rules beyond the structural ones shared by every component
    pub(super) fn content_errors(&self, component: &Component, mode: ValidationMode) -> Vec<String> {
        if mode != ValidationMode::Content {
            return Vec::new();
        }
        let title_empty = || component.field("title").is_some_and(|f| f.value().is_empty());
        match self {
            ComponentKind::Article if title_empty() => vec!["Title cannot be empty.".to_string()],
            ComponentKind::Metadata if title_empty() => {
                vec!["Title cannot be empty in MetadataComponent.".to_string()]
            }
            _ => Vec::new(),
        }
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
