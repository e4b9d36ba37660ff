//! Boolean, integer and decimal literals

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;

use crate::error::FieldError;

/// Return the trimmed input, or an `Empty` error for null/blank input
pub(crate) fn require<'a>(
    raw: Option<&'a str>,
    field_type: &'static str,
) -> Result<&'a str, FieldError> {
    match raw.map(str::trim) {
        Some(s) if !s.is_empty() => Ok(s),
        _ => Err(FieldError::Empty { field_type }),
    }
}

/// Parse `true`/`false`, ignoring case and surrounding whitespace
pub fn parse_boolean(raw: Option<&str>) -> Result<bool, FieldError> {
    let s = require(raw, "Boolean")?;
    if s.eq_ignore_ascii_case("true") {
        Ok(true)
    } else if s.eq_ignore_ascii_case("false") {
        Ok(false)
    } else {
        Err(FieldError::invalid(s, "boolean (expected true/false)"))
    }
}

/// Canonical text for a boolean
pub fn format_boolean(value: bool) -> &'static str {
    if value {
        "True"
    } else {
        "False"
    }
}

/// Parse a 32-bit signed integer literal
pub fn parse_integer(raw: Option<&str>) -> Result<i32, FieldError> {
    let s = require(raw, "Integer")?;
    s.parse::<i32>()
        .map_err(|_| FieldError::invalid(s, "integer"))
}

fn decimal_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^([+-])?([0-9]*)(?:\.([0-9]*))?$").expect("decimal pattern is valid")
    })
}

/// An arbitrary-precision decimal kept in canonical textual form.
///
/// The canonical form has no `+` sign, no redundant leading zeros in the
/// integer part, and keeps the fractional digits exactly as written
/// (`"1.50"` stays `"1.50"`). Zero is never negative.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Decimal(String);

impl Decimal {
    /// Parse a decimal literal such as `-12.5`, `.25` or `+7`
    pub fn parse(raw: &str) -> Result<Self, FieldError> {
        let s = raw.trim();
        let caps = decimal_pattern()
            .captures(s)
            .ok_or_else(|| FieldError::invalid(s, "decimal"))?;

        let negative = caps.get(1).is_some_and(|m| m.as_str() == "-");
        let int_digits = caps.get(2).map_or("", |m| m.as_str());
        let frac_digits = caps.get(3).map_or("", |m| m.as_str());

        if int_digits.is_empty() && frac_digits.is_empty() {
            return Err(FieldError::invalid(s, "decimal"));
        }

        let int_part = int_digits.trim_start_matches('0');
        let int_part = if int_part.is_empty() { "0" } else { int_part };
        let is_zero = int_part == "0" && frac_digits.bytes().all(|b| b == b'0');

        let mut canonical = String::with_capacity(s.len() + 1);
        if negative && !is_zero {
            canonical.push('-');
        }
        canonical.push_str(int_part);
        if !frac_digits.is_empty() {
            canonical.push('.');
            canonical.push_str(frac_digits);
        }
        Ok(Self(canonical))
    }

    /// The zero value
    pub fn zero() -> Self {
        Self("0".to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
