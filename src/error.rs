//! Error types for field writes and tree mutation

use thiserror::Error;

/// Errors raised when a field rejects a key or a value.
///
/// Field writes fail fast: when one of these is returned the field still
/// holds whatever it held before the call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    /// Input was null, empty or whitespace for a kind that requires a value
    #[error("{field_type} value cannot be null or empty")]
    Empty { field_type: &'static str },

    /// Input could not be parsed as a literal of the field's kind
    #[error("'{value}' is not a valid {expected}")]
    Invalid {
        value: String,
        expected: &'static str,
    },

    /// Email address rule violation
    #[error("invalid email address '{value}': {reason}")]
    Email { value: String, reason: &'static str },

    /// Phone number rule violation
    #[error("invalid phone number '{value}': {reason}")]
    Phone { value: String, reason: String },

    /// URL rule violation
    #[error("invalid url '{value}': {reason}")]
    Url { value: String, reason: &'static str },

    /// Operation is not available for the field's kind
    #[error("{field_type} field does not support {operation}")]
    Unsupported {
        field_type: &'static str,
        operation: &'static str,
    },

    #[error("field key cannot be empty")]
    EmptyKey,

    /// Keys are assigned once and never overwritten
    #[error("field key is already set to '{existing}'; cannot overwrite it")]
    KeyAlreadySet { existing: String },
}

impl FieldError {
    /// Create an invalid-literal error
    pub fn invalid(value: impl Into<String>, expected: &'static str) -> Self {
        Self::Invalid {
            value: value.into(),
            expected,
        }
    }

    /// Create an email rule error
    pub fn email(value: impl Into<String>, reason: &'static str) -> Self {
        Self::Email {
            value: value.into(),
            reason,
        }
    }

    /// Create a phone rule error
    pub fn phone(value: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Phone {
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a URL rule error
    pub fn url(value: impl Into<String>, reason: &'static str) -> Self {
        Self::Url {
            value: value.into(),
            reason,
        }
    }
}

/// Errors raised by structural mutation of a component tree.
///
/// `add_field` and `add_child` are all-or-nothing: on error the component
/// is unchanged.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ComponentError {
    /// A field must carry a key before it can be attached
    #[error("cannot add a {field_type} field that has no key")]
    UnkeyedField { field_type: &'static str },

    /// Field keys are unique per component, ignoring case
    #[error("a field with key '{key}' already exists in this component (key comparison is case-insensitive)")]
    DuplicateField { key: String },

    /// Child keys are unique per component, ignoring case
    #[error("a child component with key '{key}' already exists in this component (key comparison is case-insensitive)")]
    DuplicateChild { key: String },

    /// The child failed definition-mode validation
    #[error("cannot add child component '{key}' because it is invalid: {}", errors.join("; "))]
    InvalidChild { key: String, errors: Vec<String> },

    /// A component never holds a child of its own type
    #[error("cannot add a child of the same component type '{component_type}' as the parent")]
    SameType { component_type: String },

    /// Only a template root may hold children that have children
    #[error("a non-template component cannot add child component '{key}' which already has children")]
    NestedChild { key: String },

    #[error("component key cannot be empty")]
    EmptyKey,

    /// Keys are assigned once and never overwritten
    #[error("component key is already set to '{existing}'; cannot overwrite it")]
    KeyAlreadySet { existing: String },
}
