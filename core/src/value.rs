//! Typed values carried by options and arguments.
//!
//! A [`Value`] is a tagged union over the five supported kinds. The payload
//! always matches the tag, so consumers match exhaustively instead of
//! inspecting a separate type field.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The kind of a [`Value`].
///
/// # Examples
///
/// ```
/// use cmdtree_core::{Value, ValueKind};
///
/// assert_eq!(Value::Integer(3).kind(), ValueKind::Integer);
/// assert_eq!(ValueKind::Flag.to_string(), "flag");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    /// Boolean parsed from a numeric token (`> 0` is true).
    Boolean,
    /// Signed integer.
    Integer,
    /// Double precision float.
    Double,
    /// Text, possibly unset.
    String,
    /// Presence switch; never parsed from text.
    Flag,
}

impl ValueKind {
    /// Returns the lowercase name used in messages and tree files.
    pub fn as_str(self) -> &'static str {
        match self {
            ValueKind::Boolean => "boolean",
            ValueKind::Integer => "integer",
            ValueKind::Double => "double",
            ValueKind::String => "string",
            ValueKind::Flag => "flag",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors raised when a value is set or parsed with the wrong kind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueError {
    /// A typed setter or constructor was used against a different kind.
    #[error("expected a {expected} value, found {found}")]
    KindMismatch {
        /// Kind the value holds.
        expected: ValueKind,
        /// Kind that was supplied.
        found: ValueKind,
    },
    /// Flags are set by presence only.
    #[error("flag values cannot be parsed from text")]
    FlagFromText,
}

/// Result of feeding a token to [`Value::parse`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parsed {
    /// The token was understood and the payload replaced.
    Updated,
    /// The numeric scan found nothing; the previous payload is kept.
    Kept,
}

/// A typed option or argument value.
///
/// # Examples
///
/// ```
/// use cmdtree_core::{Parsed, Value};
///
/// let mut port = Value::Integer(8080);
/// assert_eq!(port.parse("9000").unwrap(), Parsed::Updated);
/// assert_eq!(port.as_int(), 9000);
///
/// // Failed numeric scans keep the previous value.
/// assert_eq!(port.parse("abc").unwrap(), Parsed::Kept);
/// assert_eq!(port.as_int(), 9000);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum Value {
    /// Boolean payload.
    Boolean(bool),
    /// Integer payload.
    Integer(i64),
    /// Double payload.
    Double(f64),
    /// String payload; `None` means unset.
    String(Option<String>),
    /// Flag payload.
    Flag(bool),
}

impl Value {
    /// Creates the zero value of `kind` (`false`, `0`, `0.0`, unset string).
    pub fn unset(kind: ValueKind) -> Self {
        match kind {
            ValueKind::Boolean => Value::Boolean(false),
            ValueKind::Integer => Value::Integer(0),
            ValueKind::Double => Value::Double(0.0),
            ValueKind::String => Value::String(None),
            ValueKind::Flag => Value::Flag(false),
        }
    }

    /// Creates a string value from optional text.
    pub fn string(text: Option<&str>) -> Self {
        Value::String(text.map(String::from))
    }

    /// Returns the kind tag.
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Boolean(_) => ValueKind::Boolean,
            Value::Integer(_) => ValueKind::Integer,
            Value::Double(_) => ValueKind::Double,
            Value::String(_) => ValueKind::String,
            Value::Flag(_) => ValueKind::Flag,
        }
    }

    /// Returns `true` if the value has the given kind.
    pub fn is(&self, kind: ValueKind) -> bool {
        self.kind() == kind
    }

    /// Boolean or flag payload; `false` for every other kind.
    pub fn as_bool(&self) -> bool {
        match self {
            Value::Boolean(b) | Value::Flag(b) => *b,
            _ => false,
        }
    }

    /// Integer payload; `0` for every other kind.
    pub fn as_int(&self) -> i64 {
        match self {
            Value::Integer(i) => *i,
            _ => 0,
        }
    }

    /// Double payload; `0.0` for every other kind.
    pub fn as_double(&self) -> f64 {
        match self {
            Value::Double(d) => *d,
            _ => 0.0,
        }
    }

    /// String payload; `None` when unset or of another kind.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => s.as_deref(),
            _ => None,
        }
    }

    /// Sets a boolean payload.
    ///
    /// # Errors
    ///
    /// Returns [`ValueError::KindMismatch`] if the value is not a boolean.
    pub fn set_bool(&mut self, value: bool) -> Result<(), ValueError> {
        self.replace(Value::Boolean(value))
    }

    /// Sets an integer payload.
    ///
    /// # Errors
    ///
    /// Returns [`ValueError::KindMismatch`] if the value is not an integer.
    pub fn set_int(&mut self, value: i64) -> Result<(), ValueError> {
        self.replace(Value::Integer(value))
    }

    /// Sets a double payload.
    ///
    /// # Errors
    ///
    /// Returns [`ValueError::KindMismatch`] if the value is not a double.
    pub fn set_double(&mut self, value: f64) -> Result<(), ValueError> {
        self.replace(Value::Double(value))
    }

    /// Sets a string payload (an owned copy of `value`).
    ///
    /// # Errors
    ///
    /// Returns [`ValueError::KindMismatch`] if the value is not a string.
    pub fn set_string(&mut self, value: Option<&str>) -> Result<(), ValueError> {
        self.replace(Value::string(value))
    }

    /// Sets a flag payload.
    ///
    /// # Errors
    ///
    /// Returns [`ValueError::KindMismatch`] if the value is not a flag.
    pub fn set_flag(&mut self, value: bool) -> Result<(), ValueError> {
        self.replace(Value::Flag(value))
    }

    /// Copies kind and payload from `from`.
    pub fn copy_from(&mut self, from: &Value) {
        self.clone_from(from);
    }

    /// Parses `input` into the payload according to the current kind.
    ///
    /// Booleans and numbers use a leading-prefix numeric scan, so `"12px"`
    /// reads as `12`. When the scan finds no number the previous payload is
    /// kept and [`Parsed::Kept`] is returned. Strings store the text as is.
    ///
    /// # Errors
    ///
    /// Returns [`ValueError::FlagFromText`] for flag values.
    pub fn parse(&mut self, input: &str) -> Result<Parsed, ValueError> {
        let parsed = match self {
            Value::Boolean(b) => scan_integer(input).map(|n| *b = n > 0),
            Value::Integer(i) => scan_integer(input).map(|n| *i = n),
            Value::Double(d) => scan_double(input).map(|n| *d = n),
            Value::String(s) => {
                *s = Some(input.to_string());
                Some(())
            }
            Value::Flag(_) => return Err(ValueError::FlagFromText),
        };
        Ok(match parsed {
            Some(()) => Parsed::Updated,
            None => Parsed::Kept,
        })
    }

    fn replace(&mut self, value: Value) -> Result<(), ValueError> {
        if self.kind() != value.kind() {
            return Err(ValueError::KindMismatch {
                expected: self.kind(),
                found: value.kind(),
            });
        }
        *self = value;
        Ok(())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Boolean(b) | Value::Flag(b) => write!(f, "{b}"),
            Value::Integer(i) => write!(f, "{i}"),
            Value::Double(d) => write!(f, "{d}"),
            Value::String(s) => f.write_str(s.as_deref().unwrap_or("")),
        }
    }
}

/// Scans an optionally signed run of digits after leading whitespace.
fn scan_integer(input: &str) -> Option<i64> {
    let text = input.trim_start();
    let bytes = text.as_bytes();
    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let digits_start = end;
    while bytes.get(end).is_some_and(u8::is_ascii_digit) {
        end += 1;
    }
    if end == digits_start {
        return None;
    }
    text[..end].parse().ok()
}

/// Scans the longest leading prefix that reads as a float.
fn scan_double(input: &str) -> Option<f64> {
    let text = input.trim_start();
    (1..=text.len())
        .rev()
        .filter(|&end| text.is_char_boundary(end))
        .find_map(|end| text[..end].parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boolean_parse_uses_numeric_scan() {
        let mut value = Value::Boolean(false);
        assert_eq!(value.parse("1").unwrap(), Parsed::Updated);
        assert!(value.as_bool());
        assert_eq!(value.parse("0").unwrap(), Parsed::Updated);
        assert!(!value.as_bool());
        assert_eq!(value.parse("-4").unwrap(), Parsed::Updated);
        assert!(!value.as_bool());
    }

    #[test]
    fn test_boolean_parse_keeps_value_on_failed_scan() {
        let mut value = Value::Boolean(true);
        assert_eq!(value.parse("yes").unwrap(), Parsed::Kept);
        assert!(value.as_bool());
    }

    #[test]
    fn test_integer_parse_reads_leading_prefix() {
        let mut value = Value::Integer(0);
        value.parse("  42px").unwrap();
        assert_eq!(value.as_int(), 42);
        value.parse("-7").unwrap();
        assert_eq!(value.as_int(), -7);
        assert_eq!(value.parse("+").unwrap(), Parsed::Kept);
        assert_eq!(value.as_int(), -7);
    }

    #[test]
    fn test_double_parse_reads_leading_prefix() {
        let mut value = Value::Double(1.5);
        value.parse("2.25").unwrap();
        assert_eq!(value.as_double(), 2.25);
        value.parse("3e2x").unwrap();
        assert_eq!(value.as_double(), 300.0);
        assert_eq!(value.parse("x3").unwrap(), Parsed::Kept);
        assert_eq!(value.as_double(), 300.0);
    }

    #[test]
    fn test_string_parse_stores_verbatim() {
        let mut value = Value::String(None);
        value.parse(" spaced out ").unwrap();
        assert_eq!(value.as_str(), Some(" spaced out "));
    }

    #[test]
    fn test_flag_is_never_parsed_from_text() {
        let mut value = Value::Flag(false);
        assert_eq!(value.parse("1"), Err(ValueError::FlagFromText));
        assert!(!value.as_bool());
    }

    #[test]
    fn test_setters_reject_other_kinds() {
        let mut value = Value::Integer(1);
        assert_eq!(
            value.set_bool(true),
            Err(ValueError::KindMismatch {
                expected: ValueKind::Integer,
                found: ValueKind::Boolean,
            })
        );
        value.set_int(5).unwrap();
        assert_eq!(value, Value::Integer(5));
    }

    #[test]
    fn test_accessors_return_sentinels_for_other_kinds() {
        let value = Value::String(Some("x".into()));
        assert!(!value.as_bool());
        assert_eq!(value.as_int(), 0);
        assert_eq!(value.as_double(), 0.0);
        assert_eq!(Value::Integer(3).as_str(), None);
    }

    #[test]
    fn test_copy_from_takes_kind_and_payload() {
        let mut to = Value::Integer(1);
        to.copy_from(&Value::string(Some("copied")));
        assert_eq!(to.kind(), ValueKind::String);
        assert_eq!(to.as_str(), Some("copied"));
    }

    #[test]
    fn test_unset_values() {
        assert_eq!(Value::unset(ValueKind::Flag), Value::Flag(false));
        assert_eq!(Value::unset(ValueKind::String), Value::String(None));
        assert_eq!(Value::unset(ValueKind::Double).as_double(), 0.0);
    }
}
