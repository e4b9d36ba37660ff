//! Lookup of field constructors by type name

use std::collections::HashMap;

use super::{Field, FieldKind};

/// Creates fields from a type name such as `"TextField"`.
///
/// Lookups are case-insensitive. An unknown name is not an error; it simply
/// yields `None`.
pub trait FieldFactory {
    fn create_field(&self, type_name: &str) -> Option<Field>;
}

type FieldConstructor = Box<dyn Fn() -> Field + Send + Sync>;

/// Registry of field constructors keyed by lower-cased type name
pub struct FieldRegistry {
    constructors: HashMap<String, FieldConstructor>,
}

impl std::fmt::Debug for FieldRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldRegistry")
            .field("types", &self.type_names())
            .finish()
    }
}

impl Default for FieldRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl FieldRegistry {
    /// Create a registry with no entries
    pub fn empty() -> Self {
        Self {
            constructors: HashMap::new(),
        }
    }

    /// Create a registry holding `<Kind>Field` for every built-in kind,
    /// plus `ImageField` for image references
    pub fn with_builtins() -> Self {
        let mut registry = Self::empty();
        for kind in FieldKind::ALL {
            if kind == FieldKind::Document {
                continue;
            }
            registry.register(format!("{kind}Field"), move || Field::new(kind));
        }
        registry.register("ImageField", Field::image);
        registry
    }

    /// Register a constructor, replacing any entry with the same name
    pub fn register<F>(&mut self, type_name: impl Into<String>, constructor: F)
    where
        F: Fn() -> Field + Send + Sync + 'static,
    {
        self.constructors
            .insert(type_name.into().to_lowercase(), Box::new(constructor));
    }

    pub fn contains(&self, type_name: &str) -> bool {
        self.constructors.contains_key(&type_name.to_lowercase())
    }

    /// All registered names, lower-cased and sorted
    pub fn type_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.constructors.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl FieldFactory for FieldRegistry {
    fn create_field(&self, type_name: &str) -> Option<Field> {
        let name = type_name.trim();
        if name.is_empty() {
            return None;
        }
        self.constructors
            .get(&name.to_lowercase())
            .map(|constructor| constructor())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtins_cover_every_kind() {
        let registry = FieldRegistry::with_builtins();
        let cases = [
            ("BooleanField", "Boolean"),
            ("DateField", "Date"),
            ("DateTimeField", "DateTime"),
            ("TimeField", "Time"),
            ("HtmlField", "Html"),
            ("ImageField", "Document"),
            ("IntegerField", "Integer"),
            ("ListField", "List"),
            ("MarkdownField", "Markdown"),
            ("NumberField", "Number"),
            ("PhoneField", "Phone"),
            ("TextField", "Text"),
            ("TimeSpanField", "TimeSpan"),
            ("UrlField", "Url"),
            ("EmailField", "Email"),
        ];
        for (name, field_type) in cases {
            let field = registry.create_field(name).expect(name);
            assert_eq!(field.field_type(), field_type);
        }
        assert_eq!(registry.type_names().len(), cases.len());
    }

    #[test]
    fn test_lookup_ignores_case() {
        let registry = FieldRegistry::default();
        assert!(registry.create_field("textfield").is_some());
        assert!(registry.create_field("TEXTFIELD").is_some());
        assert_eq!(
            registry.create_field("imagefield").unwrap().document_type(),
            Some("Image")
        );
    }

    #[test]
    fn test_unknown_names_are_not_found() {
        let registry = FieldRegistry::default();
        assert!(registry.create_field("RichTextField").is_none());
        assert!(registry.create_field("").is_none());
        assert!(registry.create_field("   ").is_none());
    }

    #[test]
    fn test_register_custom_constructor() {
        let mut registry = FieldRegistry::empty();
        registry.register("PdfField", || Field::reference("Pdf"));
        assert!(registry.contains("pdffield"));
        let field = registry.create_field("PDFFIELD").unwrap();
        assert_eq!(field.document_type(), Some("Pdf"));
    }
}
