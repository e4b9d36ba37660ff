//! Templates and their population
//!
//! A [`Template`] is a root component with an id and a lifecycle mode. It
//! starts in definition mode while its structure is assembled, and moves to
//! populated mode once a [`TemplatePopulator`] has applied a document to it.
//!
//! # Example
//!
//! ```rust
//! use content_model::component::{Component, ComponentKind};
//! use content_model::document::Document;
//! use content_model::template::{Template, TemplatePopulator};
//!
//! let mut template = Template::keyed("home").unwrap();
//! template
//!     .add_child(Component::keyed(ComponentKind::Article, "article").unwrap())
//!     .unwrap();
//!
//! let doc = Document::new()
//!     .with_value("article.title", "Hello")
//!     .with_value("title", "Home page");
//! TemplatePopulator::new().populate(&mut template, &doc).unwrap();
//!
//! assert!(template.is_populated());
//! assert!(template.validate().is_empty());
//! ```

mod config;
mod populator;
mod tree;

pub use config::PopulatorConfig;
pub use populator::{PopulateError, TemplatePopulator};
pub use tree::{Template, TemplateError, TemplateMode};
