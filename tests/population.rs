//! Integration tests for component trees, template lifecycle and population

use content_model::{
    format_entries, Component, ComponentError, ComponentKind, Document, Field, FieldKind,
    PopulateError, Template, TemplateError, TemplateMode, TemplatePopulator, ValidationMode,
};
use pretty_assertions::assert_eq;
use uuid::Uuid;

fn custom(component_type: &str, key: &str) -> Component {
    Component::keyed(ComponentKind::Custom(component_type.to_string()), key)
        .expect("key should be accepted")
}

fn page() -> Template {
    let mut template = Template::keyed("page").expect("key should be accepted");
    template
        .add_field(Field::keyed(FieldKind::Text, "pageTitle").expect("key"))
        .expect("unique field");
    template
        .add_child(Component::keyed(ComponentKind::Article, "article").expect("key"))
        .expect("valid child");
    template
}

#[test]
fn test_duplicate_child_key_differing_by_case() {
    let mut parent = custom("ParentType", "parentA");
    parent.add_child(custom("ChildType", "child1")).expect("first child");
    let err = parent
        .add_child(custom("OtherChildType", "CHILD1"))
        .expect_err("case-insensitive duplicate");
    assert!(matches!(err, ComponentError::DuplicateChild { .. }));
}

#[test]
fn test_child_with_parent_type_rejected() {
    let mut parent = custom("ParentType", "parentA");
    let err = parent
        .add_child(custom("ParentType", "childA"))
        .expect_err("same type");
    assert_eq!(
        err,
        ComponentError::SameType {
            component_type: "ParentType".to_string()
        }
    );
}

#[test]
fn test_non_template_parent_refuses_grandchildren() {
    let mut parent = custom("ParentType", "parentA");
    let mut child = custom("ChildType", "childB");
    child
        .add_child(custom("GrandChildType", "grandChild1"))
        .expect("leaf child");
    assert!(matches!(
        parent.add_child(child.clone()),
        Err(ComponentError::NestedChild { .. })
    ));

    let mut template = Template::keyed("root").expect("key");
    template.add_child(child).expect("templates accept nested children");
    assert_eq!(template.children().len(), 1);
}

#[test]
fn test_unkeyed_field_is_refused() {
    let mut template = page();
    let err = template
        .add_field(Field::new(FieldKind::Text))
        .expect_err("field without a key");
    assert_eq!(
        err,
        TemplateError::Component(ComponentError::UnkeyedField { field_type: "Text" })
    );
    assert_eq!(template.fields().len(), 1);
}

#[test]
fn test_mark_populated_twice_fails() {
    let mut template = page();
    template.mark_populated().expect("first transition");
    assert_eq!(
        template.mark_populated(),
        Err(TemplateError::AlreadyPopulated)
    );
}

#[test]
fn test_definition_validation_requires_id() {
    let mut template = page();
    assert_eq!(template.validate(), vec!["Template has no assigned ID."]);
    template.set_id(Uuid::new_v4()).expect("first id");
    assert!(template.validate().is_empty());
}

#[test]
fn test_populate_root_field() {
    let mut template = page();
    let doc = Document::new().with_value("pageTitle", "Home Page");
    TemplatePopulator::new()
        .populate(&mut template, &doc)
        .expect("populate");
    assert_eq!(template.field("pageTitle").expect("field").value(), "Home Page");
    assert_eq!(template.mode(), TemplateMode::Populated);
}

#[test]
fn test_populate_skips_missing_component() {
    let mut template = page();
    let before = template.entries();
    let doc = Document::new().with_value("sidebar.title", "X");
    TemplatePopulator::new()
        .populate(&mut template, &doc)
        .expect("missing components are skipped");

    let after: Vec<(String, String)> = template
        .entries()
        .into_iter()
        .filter(|(path, _)| !path.starts_with("__metadata."))
        .collect();
    assert_eq!(after, before);
    assert!(template.is_populated());
}

#[test]
fn test_populate_child_field() {
    let mut template = page();
    let doc = Document::new().with_value("article.title", "Hello");
    TemplatePopulator::new()
        .populate(&mut template, &doc)
        .expect("populate");
    let article = template.child("article").expect("child");
    assert_eq!(article.field("title").expect("field").value(), "Hello");
}

#[test]
fn test_populate_reaches_nested_components() {
    let mut template = page();
    let mut section = custom("Section", "section");
    section
        .add_child(Component::keyed(ComponentKind::Text, "caption").expect("key"))
        .expect("leaf child");
    template.add_child(section).expect("nested child under template");

    let doc = Document::new().with_value("CAPTION.Text", "Under the photo");
    TemplatePopulator::new()
        .populate(&mut template, &doc)
        .expect("populate");
    let caption = template.find_component("caption").expect("found depth-first");
    assert_eq!(caption.field("text").expect("field").value(), "Under the photo");
}

#[test]
fn test_populate_aborts_on_rejected_value() {
    let mut template = page();
    template
        .add_field(Field::keyed(FieldKind::Phone, "phone").expect("key"))
        .expect("unique field");
    let doc = Document::new().with_value("phone", "12345");

    let err = TemplatePopulator::new()
        .populate(&mut template, &doc)
        .expect_err("five digits is too short");
    assert!(matches!(err, PopulateError::Field { ref path, .. } if path == "phone"));
    assert_eq!(template.mode(), TemplateMode::Definition);
}

#[test]
fn test_validation_is_idempotent() {
    let mut template = Template::new();
    assert!(template.add_child(Component::markdown()).is_err());
    template
        .add_child(Component::keyed(ComponentKind::Metadata, "meta").expect("key"))
        .expect("valid child");

    let first = template.validate();
    let second = template.validate();
    assert_eq!(first, second);
    assert_eq!(
        first,
        vec![
            "Template has no assigned ID.",
            "Component of type 'Template' has no Key set.",
        ]
    );

    let content_first = template.validate_with(ValidationMode::Content);
    assert_eq!(content_first, template.validate_with(ValidationMode::Content));
    assert_eq!(
        content_first,
        vec![
            "Component of type 'Template' has no Key set.",
            "Title cannot be empty in MetadataComponent.",
        ]
    );
}

#[test]
fn test_populated_listing() {
    let mut template = page();
    template.set_id(Uuid::new_v4()).expect("id");
    let doc = Document::new()
        .with_value("pageTitle", "Home Page")
        .with_value("article.title", "Hello")
        .with_value("article.image", "img-42")
        .with_value("description", "Landing page")
        .with_value("title", "Home");
    TemplatePopulator::new()
        .populate(&mut template, &doc)
        .expect("populate");

    insta::assert_snapshot!(format_entries(&template), @r###"
    pageTitle = "Home Page"
    article.title = "Hello"
    article.summary = ""
    article.content = ""
    article.image = "img-42"
    __metadata.title = "Home"
    __metadata.description = "Landing page"
    "###);
    assert!(template.validate().is_empty());
}
