//! Populating a template tree from a flat document
//!
//! Each document key is a key-path. A bare `fieldKey` addresses a field on
//! the template root, falling back to the metadata child. A dotted
//! `componentKey.fieldKey` is split at its first dot: the component is found
//! by depth-first search from the root (the root included) and the field by
//! the whole remainder, so `"a.b.c"` looks for field `"b.c"` on component
//! `"a"`. All lookups ignore case. Paths that resolve to nothing are skipped.

use thiserror::Error;
use tracing::{debug, info, trace};

use crate::component::{Component, ComponentKind};
use crate::document::DocumentSource;
use crate::error::FieldError;
use crate::field::Field;

use super::{PopulatorConfig, Template, TemplateError};

/// Errors that abort population
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PopulateError {
    /// A field rejected its value; fields written before it keep their new values
    #[error("cannot populate '{path}': {source}")]
    Field {
        path: String,
        #[source]
        source: FieldError,
    },

    #[error(transparent)]
    Template(#[from] TemplateError),
}

/// Applies document values to a template and marks it populated
#[derive(Debug, Clone, Default)]
pub struct TemplatePopulator {
    config: PopulatorConfig,
}

impl TemplatePopulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: PopulatorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PopulatorConfig {
        &self.config
    }

    /// Populate `template` from `document`.
    ///
    /// Fails before touching the tree when the template is already
    /// populated. Stops at the first value a field rejects. On success the
    /// template is left in populated mode.
    pub fn populate(
        &self,
        template: &mut Template,
        document: &impl DocumentSource,
    ) -> Result<(), PopulateError> {
        if template.is_populated() {
            return Err(TemplateError::AlreadyPopulated.into());
        }
        if self.config.metadata_fallback {
            self.ensure_metadata(template)?;
        }

        let mut written = 0usize;
        for (path, raw) in document.entries() {
            let Some(field) = self.resolve(template, path) else {
                debug!(path, "no field matches key-path, skipping");
                continue;
            };
            field
                .set_value(Some(raw))
                .map_err(|source| PopulateError::Field {
                    path: path.to_string(),
                    source,
                })?;
            trace!(path, value = %field.value(), "field populated");
            written += 1;
        }

        template.mark_populated()?;
        info!(
            template = template.key(),
            document = ?document.id(),
            fields = written,
            "template populated"
        );
        Ok(())
    }

    fn ensure_metadata(&self, template: &mut Template) -> Result<(), TemplateError> {
        let key = self.config.metadata_key.as_str();
        if template.child(key).is_some() {
            return Ok(());
        }
        debug!(key, "adding metadata component");
        let metadata = Component::keyed(ComponentKind::Metadata, key)?;
        template.add_child(metadata)
    }

    fn resolve<'t>(&self, template: &'t mut Template, path: &str) -> Option<&'t mut Field> {
        match path.split_once('.') {
            None => {
                if template.field(path).is_some() {
                    return template.field_mut(path);
                }
                if !self.config.metadata_fallback {
                    return None;
                }
                template
                    .child_mut(&self.config.metadata_key)?
                    .field_mut(path)
            }
            Some((component_key, field_key)) => template
                .find_component_mut(component_key)?
                .field_mut(field_key),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;
    use crate::field::FieldKind;
    use pretty_assertions::assert_eq;

    fn template_with_title() -> Template {
        let mut template = Template::keyed("page").unwrap();
        template
            .add_field(Field::keyed(FieldKind::Text, "pageTitle").unwrap())
            .unwrap();
        template
    }

    #[test]
    fn test_root_field_by_bare_key() {
        let mut template = template_with_title();
        let doc = Document::new().with_value("PAGETITLE", "Hello");
        TemplatePopulator::new().populate(&mut template, &doc).unwrap();
        assert_eq!(template.field("pageTitle").unwrap().value(), "Hello");
        assert!(template.is_populated());
    }

    #[test]
    fn test_metadata_child_created_and_used_as_fallback() {
        let mut template = template_with_title();
        let doc = Document::new()
            .with_value("title", "Meta title")
            .with_value("description", "About");
        TemplatePopulator::new().populate(&mut template, &doc).unwrap();

        let metadata = template.child("__metadata").unwrap();
        assert_eq!(metadata.component_type(), "MetadataComponent");
        assert_eq!(metadata.field("title").unwrap().value(), "Meta title");
        assert_eq!(metadata.field("description").unwrap().value(), "About");
    }

    #[test]
    fn test_existing_metadata_child_is_reused() {
        let mut template = template_with_title();
        let mut metadata = Component::keyed(ComponentKind::Metadata, "__metadata").unwrap();
        metadata.field_mut("title").unwrap().set_value(Some("old")).unwrap();
        template.add_child(metadata).unwrap();

        TemplatePopulator::new()
            .populate(&mut template, &Document::new())
            .unwrap();
        assert_eq!(template.children().len(), 1);
        assert_eq!(
            template.child("__metadata").unwrap().field("title").unwrap().value(),
            "old"
        );
    }

    #[test]
    fn test_fallback_disabled_skips_unmatched_bare_keys() {
        let mut template = template_with_title();
        let populator =
            TemplatePopulator::with_config(PopulatorConfig::new().with_metadata_fallback(false));
        let doc = Document::new().with_value("title", "ignored");
        populator.populate(&mut template, &doc).unwrap();
        assert!(template.children().is_empty());
        assert!(template.is_populated());
    }

    #[test]
    fn test_only_first_dot_splits() {
        let mut template = template_with_title();
        let mut hero = Component::keyed(ComponentKind::Custom("Hero".into()), "hero").unwrap();
        hero.add_field(Field::keyed(FieldKind::Text, "cta.label").unwrap())
            .unwrap();
        template.add_child(hero).unwrap();

        let doc = Document::new().with_value("Hero.CTA.Label", "Buy");
        TemplatePopulator::new().populate(&mut template, &doc).unwrap();
        assert_eq!(
            template.child("hero").unwrap().field("cta.label").unwrap().value(),
            "Buy"
        );
    }

    #[test]
    fn test_root_key_prefix_addresses_root() {
        let mut template = template_with_title();
        let doc = Document::new().with_value("page.pageTitle", "Via root");
        TemplatePopulator::new().populate(&mut template, &doc).unwrap();
        assert_eq!(template.field("pageTitle").unwrap().value(), "Via root");
    }

    #[test]
    fn test_rejected_value_aborts_without_marking() {
        let mut template = template_with_title();
        template
            .add_field(Field::keyed(FieldKind::Integer, "count").unwrap())
            .unwrap();
        let doc = Document::new().with_value("count", "many");

        let err = TemplatePopulator::new()
            .populate(&mut template, &doc)
            .unwrap_err();
        match err {
            PopulateError::Field { path, source } => {
                assert_eq!(path, "count");
                assert_eq!(source, FieldError::invalid("many", "integer"));
            }
            other => panic!("unexpected error {other:?}"),
        }
        assert!(!template.is_populated());
    }

    #[test]
    fn test_already_populated_fails_before_mutation() {
        let mut template = template_with_title();
        template.mark_populated().unwrap();
        let doc = Document::new().with_value("pageTitle", "late");
        let err = TemplatePopulator::new()
            .populate(&mut template, &doc)
            .unwrap_err();
        assert_eq!(err, PopulateError::Template(TemplateError::AlreadyPopulated));
        assert_eq!(template.field("pageTitle").unwrap().value(), "");
        assert!(template.children().is_empty());
    }
}
