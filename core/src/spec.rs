//! Option and argument declarations.
//!
//! An [`OptionSpec`] is a named switch (`--name` / `-n`) and an
//! [`ArgumentSpec`] a positional slot. Both carry a current value, which
//! seeds every invocation, and a default value kept for help and reset.

use crate::value::{Value, ValueError, ValueKind};

/// Long name of the option every command carries.
pub const HELP_LONG: &str = "help";
/// Short name of the built-in help option.
pub const HELP_SHORT: &str = "h";
/// Description of the built-in help option.
pub const HELP_DESCRIPTION: &str = "Print help for command.";

/// Items that can be looked up by name in a declaration list.
pub trait Named {
    /// Returns `true` if `name` is this item's long or short name.
    fn is_named(&self, name: &str) -> bool;
}

/// Finds the first item answering to `name` (long or short form).
///
/// # Examples
///
/// ```
/// use cmdtree_core::{OptionSpec, get_by_name};
///
/// let options = vec![OptionSpec::flag("verbose", Some("v"), false, false, "Talk more")];
/// assert!(get_by_name(&options, "v").is_some());
/// assert!(get_by_name(&options, "verbose").is_some());
/// assert!(get_by_name(&options, "quiet").is_none());
/// ```
pub fn get_by_name<'a, T: Named>(items: &'a [T], name: &str) -> Option<&'a T> {
    items.iter().find(|item| item.is_named(name))
}

fn check_kinds(value: &Value, default_value: &Value) -> Result<(), ValueError> {
    if value.kind() == default_value.kind() {
        Ok(())
    } else {
        Err(ValueError::KindMismatch {
            expected: value.kind(),
            found: default_value.kind(),
        })
    }
}

/// A named option.
///
/// Use the typed constructors ([`flag`](OptionSpec::flag),
/// [`string`](OptionSpec::string), ...) which always produce matching value
/// and default kinds.
///
/// # Examples
///
/// ```
/// use cmdtree_core::{Named, OptionSpec, ValueKind};
///
/// let output = OptionSpec::string("output", Some("o"), None, Some("out.txt"), "Output file");
/// assert_eq!(output.kind(), ValueKind::String);
/// assert!(output.is_named("o"));
/// assert_eq!(output.default_value.as_str(), Some("out.txt"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct OptionSpec {
    /// Long name, matched against `--name`.
    pub name: String,
    /// Short name, matched against `-short`.
    pub short_name: Option<String>,
    /// Value each invocation starts from.
    pub value: Value,
    /// Declared default.
    pub default_value: Value,
    /// Help text.
    pub description: String,
}

impl OptionSpec {
    /// Creates an option from explicit values.
    ///
    /// # Errors
    ///
    /// Returns [`ValueError::KindMismatch`] when `value` and `default_value`
    /// differ in kind.
    pub fn new(
        name: &str,
        short_name: Option<&str>,
        value: Value,
        default_value: Value,
        description: &str,
    ) -> Result<Self, ValueError> {
        check_kinds(&value, &default_value)?;
        Ok(Self::typed(
            name,
            short_name,
            value,
            default_value,
            description,
        ))
    }

    fn typed(
        name: &str,
        short_name: Option<&str>,
        value: Value,
        default_value: Value,
        description: &str,
    ) -> Self {
        Self {
            name: name.to_string(),
            short_name: short_name.map(String::from),
            value,
            default_value,
            description: description.to_string(),
        }
    }

    /// Creates a boolean option (takes a numeric value token).
    pub fn boolean(
        name: &str,
        short_name: Option<&str>,
        value: bool,
        default_value: bool,
        description: &str,
    ) -> Self {
        Self::typed(
            name,
            short_name,
            Value::Boolean(value),
            Value::Boolean(default_value),
            description,
        )
    }

    /// Creates an integer option.
    pub fn integer(
        name: &str,
        short_name: Option<&str>,
        value: i64,
        default_value: i64,
        description: &str,
    ) -> Self {
        Self::typed(
            name,
            short_name,
            Value::Integer(value),
            Value::Integer(default_value),
            description,
        )
    }

    /// Creates a double option.
    pub fn double(
        name: &str,
        short_name: Option<&str>,
        value: f64,
        default_value: f64,
        description: &str,
    ) -> Self {
        Self::typed(
            name,
            short_name,
            Value::Double(value),
            Value::Double(default_value),
            description,
        )
    }

    /// Creates a string option.
    pub fn string(
        name: &str,
        short_name: Option<&str>,
        value: Option<&str>,
        default_value: Option<&str>,
        description: &str,
    ) -> Self {
        Self::typed(
            name,
            short_name,
            Value::string(value),
            Value::string(default_value),
            description,
        )
    }

    /// Creates a flag option, set by presence alone.
    pub fn flag(
        name: &str,
        short_name: Option<&str>,
        value: bool,
        default_value: bool,
        description: &str,
    ) -> Self {
        Self::typed(
            name,
            short_name,
            Value::Flag(value),
            Value::Flag(default_value),
            description,
        )
    }

    /// The `--help` / `-h` flag registered on every command.
    pub fn help() -> Self {
        Self::flag(HELP_LONG, Some(HELP_SHORT), false, false, HELP_DESCRIPTION)
    }

    /// Returns `true` for the built-in help option.
    pub fn is_help(&self) -> bool {
        *self == Self::help()
    }

    /// Kind of the option's value.
    pub fn kind(&self) -> ValueKind {
        self.value.kind()
    }

    /// Returns `true` if the option takes no value token.
    pub fn is_flag(&self) -> bool {
        self.value.is(ValueKind::Flag)
    }

    /// Returns `true` if `name` equals the long name.
    pub fn matches_long(&self, name: &str) -> bool {
        self.name == name
    }

    /// Returns `true` if `name` equals the short name.
    pub fn matches_short(&self, name: &str) -> bool {
        self.short_name.as_deref() == Some(name)
    }

    /// Returns `true` if both options share long and short names.
    pub fn same_identity(&self, other: &OptionSpec) -> bool {
        self.name == other.name && self.short_name == other.short_name
    }
}

impl Named for OptionSpec {
    fn is_named(&self, name: &str) -> bool {
        self.matches_long(name) || self.matches_short(name)
    }
}

/// A positional argument.
///
/// # Examples
///
/// ```
/// use cmdtree_core::ArgumentSpec;
///
/// let count = ArgumentSpec::integer("count", 1, 1, "How many").optional();
/// assert!(count.optional);
/// assert_eq!(count.value.as_int(), 1);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ArgumentSpec {
    /// Name shown in usage as `<name>`.
    pub name: String,
    /// Value each invocation starts from.
    pub value: Value,
    /// Declared default.
    pub default_value: Value,
    /// Help text.
    pub description: String,
    /// Whether the argument may be left unbound under strict arity.
    pub optional: bool,
}

impl ArgumentSpec {
    /// Creates an argument from explicit values.
    ///
    /// # Errors
    ///
    /// Returns [`ValueError::KindMismatch`] when `value` and `default_value`
    /// differ in kind.
    pub fn new(
        name: &str,
        value: Value,
        default_value: Value,
        description: &str,
    ) -> Result<Self, ValueError> {
        check_kinds(&value, &default_value)?;
        Ok(Self::typed(name, value, default_value, description))
    }

    fn typed(name: &str, value: Value, default_value: Value, description: &str) -> Self {
        Self {
            name: name.to_string(),
            value,
            default_value,
            description: description.to_string(),
            optional: false,
        }
    }

    /// Creates a boolean argument.
    pub fn boolean(name: &str, value: bool, default_value: bool, description: &str) -> Self {
        Self::typed(
            name,
            Value::Boolean(value),
            Value::Boolean(default_value),
            description,
        )
    }

    /// Creates an integer argument.
    pub fn integer(name: &str, value: i64, default_value: i64, description: &str) -> Self {
        Self::typed(
            name,
            Value::Integer(value),
            Value::Integer(default_value),
            description,
        )
    }

    /// Creates a double argument.
    pub fn double(name: &str, value: f64, default_value: f64, description: &str) -> Self {
        Self::typed(
            name,
            Value::Double(value),
            Value::Double(default_value),
            description,
        )
    }

    /// Creates a string argument.
    pub fn string(
        name: &str,
        value: Option<&str>,
        default_value: Option<&str>,
        description: &str,
    ) -> Self {
        Self::typed(
            name,
            Value::string(value),
            Value::string(default_value),
            description,
        )
    }

    /// Creates a flag argument. Tokens bound to it are consumed but never
    /// change its value.
    pub fn flag(name: &str, value: bool, default_value: bool, description: &str) -> Self {
        Self::typed(
            name,
            Value::Flag(value),
            Value::Flag(default_value),
            description,
        )
    }

    /// Marks the argument optional.
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Kind of the argument's value.
    pub fn kind(&self) -> ValueKind {
        self.value.kind()
    }
}

impl Named for ArgumentSpec {
    fn is_named(&self, name: &str) -> bool {
        self.name == name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typed_constructors_match_kinds() {
        let options = [
            OptionSpec::boolean("b", None, true, false, ""),
            OptionSpec::integer("i", None, 1, 2, ""),
            OptionSpec::double("d", None, 1.0, 2.0, ""),
            OptionSpec::string("s", None, Some("a"), None, ""),
            OptionSpec::flag("f", None, false, false, ""),
        ];
        for option in &options {
            assert_eq!(option.value.kind(), option.default_value.kind());
        }
    }

    #[test]
    fn test_generic_constructor_rejects_mismatched_kinds() {
        let err =
            OptionSpec::new("n", None, Value::Integer(1), Value::Flag(false), "").unwrap_err();
        assert_eq!(
            err,
            ValueError::KindMismatch {
                expected: ValueKind::Integer,
                found: ValueKind::Flag,
            }
        );
        assert!(ArgumentSpec::new("a", Value::Double(0.0), Value::String(None), "").is_err());
    }

    #[test]
    fn test_get_by_name_matches_long_and_short() {
        let options = vec![
            OptionSpec::help(),
            OptionSpec::string("name", Some("n"), None, None, "Name"),
        ];
        assert_eq!(get_by_name(&options, "n").unwrap().name, "name");
        assert_eq!(get_by_name(&options, "help").unwrap().name, "help");
        assert!(get_by_name(&options, "x").is_none());
    }

    #[test]
    fn test_arguments_are_looked_up_by_name_only() {
        let args = vec![ArgumentSpec::string("file", None, None, "")];
        assert!(get_by_name(&args, "file").is_some());
        assert!(get_by_name(&args, "f").is_none());
    }

    #[test]
    fn test_help_option_shape() {
        let help = OptionSpec::help();
        assert!(help.is_flag());
        assert!(help.is_help());
        assert!(help.matches_short("h"));
        assert!(!help.value.as_bool());
    }
}
