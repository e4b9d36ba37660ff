//! Email, phone and URL value objects
//!
//! Each value object is created through `parse`, which trims and validates
//! the raw text and keeps only the canonical form. A constructed value is
//! always valid.

use std::fmt;

use crate::error::FieldError;

fn count_occurrences(text: &str, needle: &str) -> usize {
    text.matches(needle).count()
}

/// A validated mailbox address such as `user.name+tag@example.com`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EmailAddress(String);

impl EmailAddress {
    pub fn parse(raw: &str) -> Result<Self, FieldError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(FieldError::email(raw, "email cannot be empty"));
        }
        if trimmed.chars().any(char::is_whitespace) {
            return Err(FieldError::email(
                trimmed,
                "email cannot contain whitespace or control characters",
            ));
        }
        if count_occurrences(trimmed, "@") != 1 {
            return Err(FieldError::email(
                trimmed,
                "email must contain exactly one '@' character",
            ));
        }

        let (local, domain) = trimmed
            .split_once('@')
            .ok_or_else(|| FieldError::email(trimmed, "email must contain an '@' character"))?;
        if local.is_empty() {
            return Err(FieldError::email(trimmed, "local part (before @) cannot be empty"));
        }
        if domain.is_empty() {
            return Err(FieldError::email(trimmed, "domain part (after @) cannot be empty"));
        }
        if !allowed_mailbox_chars(local) || !allowed_mailbox_chars(domain) {
            return Err(FieldError::email(trimmed, "email contains invalid characters"));
        }

        let address = parse_mailbox(trimmed)
            .ok_or_else(|| FieldError::email(trimmed, "not a valid mailbox address"))?;
        Ok(Self(address.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn local_part(&self) -> &str {
        self.0.split_once('@').map_or("", |(local, _)| local)
    }

    pub fn domain(&self) -> &str {
        self.0.split_once('@').map_or("", |(_, domain)| domain)
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn allowed_mailbox_chars(segment: &str) -> bool {
    segment
        .chars()
        .all(|ch| ch.is_alphanumeric() || matches!(ch, '.' | '-' | '_' | '+'))
}

/// Dot-atom text: non-empty atoms separated by single dots
fn is_dot_atom(text: &str) -> bool {
    !text.is_empty() && text.split('.').all(|atom| !atom.is_empty())
}

/// Reduce `Display Name <addr>` or `addr` to the bare address, checking
/// that both sides of the `@` are dot-atoms
fn parse_mailbox(input: &str) -> Option<&str> {
    let address = match (input.rfind('<'), input.ends_with('>')) {
        (Some(open), true) => &input[open + 1..input.len() - 1],
        (None, false) => input,
        _ => return None,
    };
    let (local, domain) = address.split_once('@')?;
    (is_dot_atom(local) && is_dot_atom(domain)).then_some(address)
}

/// A phone number reduced to digits with an optional leading `+`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    pub const MIN_DIGITS: usize = 6;
    pub const MAX_DIGITS: usize = 20;

    /// Strip whitespace, parentheses and hyphens, then validate the rest.
    ///
    /// `"(08) 9332-1234"` becomes `"0893321234"` and
    /// `"+61 8 9332-1234"` becomes `"+61893321234"`.
    pub fn parse(raw: &str) -> Result<Self, FieldError> {
        let normalized: String = raw
            .chars()
            .filter(|ch| !ch.is_whitespace() && !matches!(ch, '(' | ')' | '-'))
            .collect();

        if normalized.is_empty() {
            return Err(FieldError::phone(
                raw,
                "phone number is empty after removing whitespace, parentheses and hyphens",
            ));
        }

        let digits = normalized.strip_prefix('+').unwrap_or(&normalized);
        let offset = normalized.len() - digits.len();
        if let Some((index, ch)) = digits.char_indices().find(|(_, ch)| !ch.is_ascii_digit()) {
            return Err(FieldError::phone(
                raw,
                format!(
                    "invalid character '{ch}' at index {}; only digits are allowed after an optional leading '+'",
                    index + offset
                ),
            ));
        }

        let count = digits.len();
        if !(Self::MIN_DIGITS..=Self::MAX_DIGITS).contains(&count) {
            return Err(FieldError::phone(
                raw,
                format!(
                    "phone number must have {}..{} digits, found {count}",
                    Self::MIN_DIGITS,
                    Self::MAX_DIGITS
                ),
            ));
        }

        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_international(&self) -> bool {
        self.0.starts_with('+')
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A structurally checked URL: absolute, relative, root-relative or
/// protocol-relative. Neither the scheme nor the host is validated.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UrlValue(String);

impl UrlValue {
    pub fn parse(raw: &str) -> Result<Self, FieldError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(FieldError::url(raw, "url cannot be empty"));
        }
        if trimmed.chars().any(char::is_whitespace) {
            return Err(FieldError::url(trimmed, "url cannot contain whitespace"));
        }
        if trimmed.starts_with("://") {
            return Err(FieldError::url(
                trimmed,
                "url must not start with '://'; use a scheme, '//' or a relative path",
            ));
        }
        if count_occurrences(trimmed, "://") > 1 {
            return Err(FieldError::url(trimmed, "url cannot contain more than one '://'"));
        }
        if count_occurrences(trimmed, "?") > 1 {
            return Err(FieldError::url(trimmed, "url cannot contain more than one '?'"));
        }
        if count_occurrences(trimmed, "#") > 1 {
            return Err(FieldError::url(trimmed, "url cannot contain more than one '#'"));
        }
        if !trimmed.chars().all(is_url_char) {
            return Err(FieldError::url(trimmed, "url contains invalid characters"));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UrlValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Unreserved and reserved characters of RFC 3986 plus `%`
fn is_url_char(ch: char) -> bool {
    ch.is_alphanumeric()
        || matches!(
            ch,
            '-' | '.'
                | '_'
                | '~'
                | ':'
                | '/'
                | '?'
                | '#'
                | '['
                | ']'
                | '@'
                | '!'
                | '$'
                | '&'
                | '\''
                | '('
                | ')'
                | '*'
                | '+'
                | ','
                | ';'
                | '='
                | '%'
        )
}
