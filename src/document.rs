//! Documents: identified, flat key/value data sources
//!
//! Keys are key-paths such as `"article.title"` or a bare `"pageTitle"`.
//! Values are raw text; each field parses its own value on population.

use std::cell::OnceCell;
use std::collections::BTreeMap;

use thiserror::Error;
use uuid::Uuid;

/// Errors raised by document identity operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DocumentError {
    #[error("document id is already set to {existing}; cannot overwrite it")]
    IdAlreadySet { existing: Uuid },

    #[error("document id cannot be the nil uuid")]
    NilId,
}

/// Anything a template can be populated from
pub trait DocumentSource {
    fn id(&self) -> Option<Uuid>;

    /// The flat `(key-path, raw value)` pairs, in a stable order
    fn entries(&self) -> Box<dyn Iterator<Item = (&str, &str)> + '_>;
}

#[derive(Debug, Clone, Default)]
pub struct Document {
    id: OnceCell<Uuid>,
    values: BTreeMap<String, String>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(&self) -> Option<Uuid> {
        self.id.get().copied()
    }

    /// Assign the id. Succeeds only once, and never with the nil uuid.
    pub fn set_id(&mut self, id: Uuid) -> Result<(), DocumentError> {
        if id.is_nil() {
            return Err(DocumentError::NilId);
        }
        if let Some(existing) = self.id() {
            return Err(DocumentError::IdAlreadySet { existing });
        }
        self.id.get_or_init(|| id);
        Ok(())
    }

    /// Set a value, returning the one it replaced
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.values.insert(key.into(), value.into())
    }

    /// Builder form of [`Document::insert`]
    pub fn with_value(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.values.remove(key)
    }

    pub fn values(&self) -> &BTreeMap<String, String> {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Empty when the document is valid
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if self.id().is_none() {
            errors.push("Document has no assigned ID.".to_string());
        }
        errors
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Document {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut document = Document::new();
        for (key, value) in iter {
            document.insert(key, value);
        }
        document
    }
}

impl DocumentSource for Document {
    fn id(&self) -> Option<Uuid> {
        Document::id(self)
    }

    fn entries(&self) -> Box<dyn Iterator<Item = (&str, &str)> + '_> {
        Box::new(
            self.values
                .iter()
                .map(|(key, value)| (key.as_str(), value.as_str())),
        )
    }
}

/// A document rendered through a template
#[derive(Debug, Clone, Default)]
pub struct WebpageDocument {
    document: Document,
    template_id: Option<Uuid>,
}

impl WebpageDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_document(document: Document) -> Self {
        Self {
            document,
            template_id: None,
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    pub fn template_id(&self) -> Option<Uuid> {
        self.template_id
    }

    /// Unlike the document id, the template id may be reassigned
    pub fn set_template_id(&mut self, template_id: Option<Uuid>) {
        self.template_id = template_id;
    }

    /// Document checks, then a non-nil template id
    pub fn validate(&self) -> Vec<String> {
        let mut errors = self.document.validate();
        if self.template_id.map_or(true, |id| id.is_nil()) {
            errors.push("WebpageDocument requires a non-empty TemplateId.".to_string());
        }
        errors
    }
}

impl DocumentSource for WebpageDocument {
    fn id(&self) -> Option<Uuid> {
        self.document.id()
    }

    fn entries(&self) -> Box<dyn Iterator<Item = (&str, &str)> + '_> {
        self.document.entries()
    }
}
