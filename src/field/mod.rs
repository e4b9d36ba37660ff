//! Typed fields
//!
//! A [`Field`] is a keyed, typed value holder. Every write goes through
//! [`Field::set_value`], which parses and normalizes the raw text for the
//! field's [`FieldKind`] and either stores the result or returns a
//! [`FieldError`] without touching the previous value. Reads always yield
//! the canonical text form.
//!
//! # Example
//!
//! ```rust
//! use content_model::field::{Field, FieldKind};
//!
//! let mut field = Field::keyed(FieldKind::Boolean, "published").unwrap();
//! field.set_value(Some("true")).unwrap();
//! assert_eq!(field.value(), "True");
//! assert!(field.set_value(Some("yes")).is_err());
//! assert_eq!(field.value(), "True");
//! ```

mod contact;
mod list;
mod reference;
mod registry;
mod scalar;
mod temporal;

pub use contact::{EmailAddress, PhoneNumber, UrlValue};
pub use list::TokenSet;
pub use reference::DocumentReference;
pub use registry::{FieldFactory, FieldRegistry};
pub use scalar::Decimal;
pub use temporal::TimeSpan;

use std::cell::OnceCell;
use std::fmt;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};

use crate::error::FieldError;

/// Case-insensitive key comparison used for every key lookup in the tree
pub(crate) fn keys_match(a: &str, b: &str) -> bool {
    a.eq_ignore_ascii_case(b) || a.to_lowercase() == b.to_lowercase()
}

/// The closed set of field kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    Text,
    Markdown,
    Html,
    Boolean,
    Integer,
    Number,
    Date,
    Time,
    DateTime,
    TimeSpan,
    List,
    Email,
    Phone,
    Url,
    /// Reference to another document; see [`DocumentReference`]
    Document,
}

impl FieldKind {
    pub const ALL: [FieldKind; 15] = [
        FieldKind::Text,
        FieldKind::Markdown,
        FieldKind::Html,
        FieldKind::Boolean,
        FieldKind::Integer,
        FieldKind::Number,
        FieldKind::Date,
        FieldKind::Time,
        FieldKind::DateTime,
        FieldKind::TimeSpan,
        FieldKind::List,
        FieldKind::Email,
        FieldKind::Phone,
        FieldKind::Url,
        FieldKind::Document,
    ];

    /// The type tag reported by [`Field::field_type`]
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKind::Text => "Text",
            FieldKind::Markdown => "Markdown",
            FieldKind::Html => "Html",
            FieldKind::Boolean => "Boolean",
            FieldKind::Integer => "Integer",
            FieldKind::Number => "Number",
            FieldKind::Date => "Date",
            FieldKind::Time => "Time",
            FieldKind::DateTime => "DateTime",
            FieldKind::TimeSpan => "TimeSpan",
            FieldKind::List => "List",
            FieldKind::Email => "Email",
            FieldKind::Phone => "Phone",
            FieldKind::Url => "Url",
            FieldKind::Document => "Document",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The stored, already-normalized value of a field
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Markdown(String),
    Html(String),
    Boolean(bool),
    Integer(i32),
    Number(Decimal),
    Date(NaiveDate),
    Time(NaiveTime),
    DateTime(DateTime<FixedOffset>),
    TimeSpan(TimeSpan),
    List(TokenSet),
    Email(Option<EmailAddress>),
    Phone(Option<PhoneNumber>),
    Url(Option<UrlValue>),
    Document(DocumentReference),
}

impl FieldValue {
    /// The value an untouched field of `kind` holds
    pub fn initial(kind: FieldKind) -> Self {
        match kind {
            FieldKind::Text => FieldValue::Text(String::new()),
            FieldKind::Markdown => FieldValue::Markdown(String::new()),
            FieldKind::Html => FieldValue::Html(String::new()),
            FieldKind::Boolean => FieldValue::Boolean(false),
            FieldKind::Integer => FieldValue::Integer(0),
            FieldKind::Number => FieldValue::Number(Decimal::zero()),
            FieldKind::Date => FieldValue::Date(temporal::min_timestamp().date_naive()),
            FieldKind::Time => FieldValue::Time(NaiveTime::default()),
            FieldKind::DateTime => FieldValue::DateTime(temporal::min_timestamp()),
            FieldKind::TimeSpan => FieldValue::TimeSpan(TimeSpan::ZERO),
            FieldKind::List => FieldValue::List(TokenSet::default()),
            FieldKind::Email => FieldValue::Email(None),
            FieldKind::Phone => FieldValue::Phone(None),
            FieldKind::Url => FieldValue::Url(None),
            FieldKind::Document => FieldValue::Document(DocumentReference::new("Document")),
        }
    }

    pub fn kind(&self) -> FieldKind {
        match self {
            FieldValue::Text(_) => FieldKind::Text,
            FieldValue::Markdown(_) => FieldKind::Markdown,
            FieldValue::Html(_) => FieldKind::Html,
            FieldValue::Boolean(_) => FieldKind::Boolean,
            FieldValue::Integer(_) => FieldKind::Integer,
            FieldValue::Number(_) => FieldKind::Number,
            FieldValue::Date(_) => FieldKind::Date,
            FieldValue::Time(_) => FieldKind::Time,
            FieldValue::DateTime(_) => FieldKind::DateTime,
            FieldValue::TimeSpan(_) => FieldKind::TimeSpan,
            FieldValue::List(_) => FieldKind::List,
            FieldValue::Email(_) => FieldKind::Email,
            FieldValue::Phone(_) => FieldKind::Phone,
            FieldValue::Url(_) => FieldKind::Url,
            FieldValue::Document(_) => FieldKind::Document,
        }
    }

    /// Parse `raw` into a new value of the same kind as `self`
    fn parse_like(&self, raw: Option<&str>) -> Result<FieldValue, FieldError> {
        let text = || raw.unwrap_or_default().to_string();
        let blank = raw.map_or(true, |s| s.trim().is_empty());

        Ok(match self {
            FieldValue::Text(_) => FieldValue::Text(text()),
            FieldValue::Markdown(_) => FieldValue::Markdown(text()),
            FieldValue::Html(_) => FieldValue::Html(text()),
            FieldValue::Boolean(_) => FieldValue::Boolean(scalar::parse_boolean(raw)?),
            FieldValue::Integer(_) => FieldValue::Integer(scalar::parse_integer(raw)?),
            FieldValue::Number(_) => {
                FieldValue::Number(Decimal::parse(scalar::require(raw, "Number")?)?)
            }
            FieldValue::Date(_) => FieldValue::Date(temporal::parse_date(raw)?),
            FieldValue::Time(_) => FieldValue::Time(temporal::parse_time(raw)?),
            FieldValue::DateTime(_) => FieldValue::DateTime(temporal::parse_timestamp(raw)?),
            FieldValue::TimeSpan(_) => FieldValue::TimeSpan(TimeSpan::parse(raw)?),
            FieldValue::List(_) => FieldValue::List(TokenSet::parse(raw)),
            FieldValue::Email(_) if blank => FieldValue::Email(None),
            FieldValue::Email(_) => {
                FieldValue::Email(Some(EmailAddress::parse(raw.unwrap_or_default())?))
            }
            FieldValue::Phone(_) => {
                FieldValue::Phone(Some(PhoneNumber::parse(raw.unwrap_or_default())?))
            }
            FieldValue::Url(_) => FieldValue::Url(Some(UrlValue::parse(raw.unwrap_or_default())?)),
            FieldValue::Document(reference) => FieldValue::Document(reference.pointing_at(raw)),
        })
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(s) | FieldValue::Markdown(s) | FieldValue::Html(s) => f.write_str(s),
            FieldValue::Boolean(b) => f.write_str(scalar::format_boolean(*b)),
            FieldValue::Integer(n) => write!(f, "{n}"),
            FieldValue::Number(d) => write!(f, "{d}"),
            FieldValue::Date(d) => f.write_str(&temporal::format_date(d)),
            FieldValue::Time(t) => f.write_str(&temporal::format_time(t)),
            FieldValue::DateTime(ts) => f.write_str(&temporal::format_timestamp(ts)),
            FieldValue::TimeSpan(span) => write!(f, "{span}"),
            FieldValue::List(tokens) => write!(f, "{tokens}"),
            FieldValue::Email(email) => f.write_str(email.as_ref().map_or("", EmailAddress::as_str)),
            FieldValue::Phone(phone) => f.write_str(phone.as_ref().map_or("", PhoneNumber::as_str)),
            FieldValue::Url(url) => f.write_str(url.as_ref().map_or("", UrlValue::as_str)),
            FieldValue::Document(reference) => f.write_str(reference.document_id().unwrap_or("")),
        }
    }
}

/// A keyed, typed value holder
#[derive(Debug, Clone)]
pub struct Field {
    key: OnceCell<String>,
    value: FieldValue,
}

impl Field {
    /// Create an unkeyed field holding the initial value for `kind`
    pub fn new(kind: FieldKind) -> Self {
        Self {
            key: OnceCell::new(),
            value: FieldValue::initial(kind),
        }
    }

    /// Create a field and assign its key in one step
    pub fn keyed(kind: FieldKind, key: impl Into<String>) -> Result<Self, FieldError> {
        let mut field = Self::new(kind);
        field.set_key(key)?;
        Ok(field)
    }

    /// Create a reference field for documents of `document_type`
    pub fn reference(document_type: impl Into<String>) -> Self {
        Self {
            key: OnceCell::new(),
            value: FieldValue::Document(DocumentReference::new(document_type)),
        }
    }

    /// Create a reference field for `"Image"` documents
    pub fn image() -> Self {
        Self::reference(DocumentReference::IMAGE)
    }

    /// The key, or `""` while unset
    pub fn key(&self) -> &str {
        self.key.get().map_or("", String::as_str)
    }

    pub fn has_key(&self) -> bool {
        self.key.get().is_some()
    }

    /// Assign the key. Succeeds only once.
    pub fn set_key(&mut self, key: impl Into<String>) -> Result<(), FieldError> {
        let key = key.into();
        if key.is_empty() {
            return Err(FieldError::EmptyKey);
        }
        self.key.set(key).map_err(|_| FieldError::KeyAlreadySet {
            existing: self.key().to_string(),
        })
    }

    pub(crate) fn matches_key(&self, key: &str) -> bool {
        self.key.get().is_some_and(|own| keys_match(own, key))
    }

    pub fn kind(&self) -> FieldKind {
        self.value.kind()
    }

    /// The type tag, e.g. `"Text"` or `"Boolean"`
    pub fn field_type(&self) -> &'static str {
        self.kind().as_str()
    }

    /// For reference fields, the kind of document referenced
    pub fn document_type(&self) -> Option<&str> {
        match &self.value {
            FieldValue::Document(reference) => Some(reference.document_type()),
            _ => None,
        }
    }

    /// Parse, normalize and store `raw`. On error the previous value is kept.
    pub fn set_value(&mut self, raw: Option<&str>) -> Result<(), FieldError> {
        self.value = self.value.parse_like(raw)?;
        Ok(())
    }

    /// Store a zoned timestamp, normalized to UTC. DateTime fields only.
    pub fn set_timestamp<Tz: TimeZone>(&mut self, value: DateTime<Tz>) -> Result<(), FieldError> {
        self.ensure_kind(FieldKind::DateTime, "structured timestamps")?;
        self.value = FieldValue::DateTime(temporal::to_utc(value));
        Ok(())
    }

    /// Store a zone-less timestamp, read as local time and normalized to
    /// UTC. DateTime fields only.
    pub fn set_local_timestamp(&mut self, value: NaiveDateTime) -> Result<(), FieldError> {
        self.ensure_kind(FieldKind::DateTime, "structured timestamps")?;
        self.value = FieldValue::DateTime(temporal::local_to_utc(value)?);
        Ok(())
    }

    fn ensure_kind(&self, kind: FieldKind, operation: &'static str) -> Result<(), FieldError> {
        if self.kind() == kind {
            Ok(())
        } else {
            Err(FieldError::Unsupported {
                field_type: self.field_type(),
                operation,
            })
        }
    }

    /// The canonical text form of the stored value
    pub fn value(&self) -> String {
        self.value.to_string()
    }

    /// The stored value before conversion to text
    pub fn typed_value(&self) -> &FieldValue {
        &self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, NaiveDate, Utc};

    fn field(kind: FieldKind) -> Field {
        Field::keyed(kind, "subject").unwrap()
    }

    #[test]
    fn test_key_is_set_once() {
        let mut f = Field::new(FieldKind::Text);
        assert_eq!(f.key(), "");
        assert!(!f.has_key());
        f.set_key("title").unwrap();
        assert_eq!(f.key(), "title");
        let err = f.set_key("other").unwrap_err();
        assert_eq!(
            err,
            FieldError::KeyAlreadySet {
                existing: "title".to_string()
            }
        );
        assert_eq!(f.key(), "title");
    }

    #[test]
    fn test_empty_key_rejected() {
        let mut f = Field::new(FieldKind::Text);
        assert_eq!(f.set_key(""), Err(FieldError::EmptyKey));
        assert!(!f.has_key());
    }

    #[test]
    fn test_text_like_kinds_store_verbatim() {
        for kind in [FieldKind::Text, FieldKind::Markdown, FieldKind::Html] {
            let mut f = field(kind);
            f.set_value(Some("  <p>raw</p>  ")).unwrap();
            assert_eq!(f.value(), "  <p>raw</p>  ");
            f.set_value(None).unwrap();
            assert_eq!(f.value(), "");
        }
    }

    #[test]
    fn test_initial_canonical_values() {
        let expected = [
            (FieldKind::Boolean, "False"),
            (FieldKind::Integer, "0"),
            (FieldKind::Number, "0"),
            (FieldKind::Date, "0001-01-01"),
            (FieldKind::Time, "00:00:00"),
            (FieldKind::DateTime, "0001-01-01T00:00:00.0000000+00:00"),
            (FieldKind::TimeSpan, "00:00:00"),
            (FieldKind::List, ""),
            (FieldKind::Email, ""),
            (FieldKind::Phone, ""),
            (FieldKind::Url, ""),
            (FieldKind::Document, ""),
        ];
        for (kind, value) in expected {
            assert_eq!(Field::new(kind).value(), value, "{kind}");
        }
    }

    #[test]
    fn test_failed_write_keeps_previous_value() {
        let cases = [
            (FieldKind::Boolean, "true", "maybe", "True"),
            (FieldKind::Integer, "42", "4.2", "42"),
            (FieldKind::Number, "1.50", "1,5", "1.50"),
            (FieldKind::Date, "2025-03-15", "2025-02-30", "2025-03-15"),
            (FieldKind::Time, "08:07:06", "25:00", "08:07:06"),
            (FieldKind::TimeSpan, "1.00:10:05", "00:61:00", "1.00:10:05"),
            (FieldKind::Phone, "(08) 9332-1234", "12345", "0893321234"),
            (FieldKind::Url, "/home", "/a b", "/home"),
            (FieldKind::Email, "a@b.co", "a@@b.co", "a@b.co"),
        ];
        for (kind, good, bad, canonical) in cases {
            let mut f = field(kind);
            f.set_value(Some(good)).unwrap();
            assert!(f.set_value(Some(bad)).is_err(), "{kind} accepted {bad}");
            assert_eq!(f.value(), canonical, "{kind}");
        }
    }

    #[test]
    fn test_email_blank_clears() {
        let mut f = field(FieldKind::Email);
        f.set_value(Some("  user@example.com  ")).unwrap();
        assert_eq!(f.value(), "user@example.com");
        f.set_value(Some("   ")).unwrap();
        assert_eq!(f.value(), "");
        f.set_value(Some("user@example.com")).unwrap();
        f.set_value(None).unwrap();
        assert_eq!(f.value(), "");
    }

    #[test]
    fn test_phone_and_url_require_input() {
        assert!(field(FieldKind::Phone).set_value(None).is_err());
        assert!(field(FieldKind::Url).set_value(Some("")).is_err());
    }

    #[test]
    fn test_list_is_a_set() {
        let mut f = field(FieldKind::List);
        f.set_value(Some("b, a, b")).unwrap();
        match f.typed_value() {
            FieldValue::List(tokens) => {
                assert_eq!(tokens.len(), 2);
                assert!(tokens.contains("a"));
            }
            other => panic!("unexpected value {other:?}"),
        }
        f.set_value(None).unwrap();
        assert_eq!(f.value(), "");
    }

    #[test]
    fn test_image_reference() {
        let mut f = Field::image();
        assert_eq!(f.field_type(), "Document");
        assert_eq!(f.document_type(), Some("Image"));
        f.set_value(Some("1F3452AB-0000")).unwrap();
        assert_eq!(f.value(), "1F3452AB-0000");
        f.set_value(None).unwrap();
        assert_eq!(f.value(), "");
        assert_eq!(f.document_type(), Some("Image"));
    }

    #[test]
    fn test_structured_timestamp_normalized_to_utc() {
        let mut f = field(FieldKind::DateTime);
        let offset = FixedOffset::east_opt(2 * 3600).unwrap();
        let ts = NaiveDate::from_ymd_opt(2025, 3, 12)
            .unwrap()
            .and_hms_opt(11, 30, 0)
            .unwrap()
            .and_local_timezone(offset)
            .unwrap();
        f.set_timestamp(ts).unwrap();
        assert_eq!(f.value(), "2025-03-12T09:30:00.0000000+00:00");

        let utc = Utc::now();
        f.set_timestamp(utc).unwrap();
        match f.typed_value() {
            FieldValue::DateTime(stored) => {
                assert_eq!(stored.offset().local_minus_utc(), 0);
                assert_eq!(stored.timestamp(), utc.timestamp());
            }
            other => panic!("unexpected value {other:?}"),
        }
    }

    #[test]
    fn test_local_timestamp_has_zero_offset() {
        let mut f = field(FieldKind::DateTime);
        let naive = NaiveDate::from_ymd_opt(2025, 6, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        f.set_local_timestamp(naive).unwrap();
        assert!(f.value().ends_with("+00:00"));
    }

    #[test]
    fn test_structured_timestamp_rejected_for_other_kinds() {
        let mut f = field(FieldKind::Date);
        assert!(matches!(
            f.set_timestamp(Utc::now()),
            Err(FieldError::Unsupported { .. })
        ));
    }

    #[test]
    fn test_keys_match_ignores_case() {
        assert!(keys_match("pageTitle", "PAGETITLE"));
        assert!(keys_match("Überschrift", "überSCHRIFT"));
        assert!(!keys_match("title", "titles"));
    }
}
