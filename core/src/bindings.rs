//! Per-invocation value tables.
//!
//! The declared tree is never written during execution. Instead every
//! invocation copies the declared values of its chain into a [`Bindings`]
//! table, and parsing mutates those copies.

use std::sync::LazyLock;

use tracing::warn;

use crate::command::Command;
use crate::error::ExecError;
use crate::spec::{ArgumentSpec, Named, OptionSpec};
use crate::value::{Parsed, Value};

/// A declaration paired with its value for one invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct Bound<'a, S> {
    /// The declaration this value belongs to.
    pub spec: &'a S,
    /// Current value.
    pub value: Value,
}

impl<S: Named> Named for Bound<'_, S> {
    fn is_named(&self, name: &str) -> bool {
        self.spec.is_named(name)
    }
}

/// An option and its invocation value.
pub type BoundOption<'a> = Bound<'a, OptionSpec>;
/// An argument and its invocation value.
pub type BoundArgument<'a> = Bound<'a, ArgumentSpec>;

/// Stands in for the help flag when nothing resolved, so `--help` is still
/// recognised.
static DETACHED_HELP: LazyLock<OptionSpec> = LazyLock::new(OptionSpec::help);

/// Result of a name lookup, with zero-ish fallbacks when nothing matched.
///
/// # Examples
///
/// ```
/// use cmdtree_core::Bindings;
///
/// let bindings = Bindings::default();
/// let missing = bindings.option("nope");
/// assert!(!missing.is_found());
/// assert_eq!(missing.as_int(), 0);
/// assert_eq!(missing.as_str(), "");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Lookup<'v>(Option<&'v Value>);

impl<'v> Lookup<'v> {
    /// The value, if the name matched.
    pub fn value(self) -> Option<&'v Value> {
        self.0
    }

    /// Returns `true` if the name matched.
    pub fn is_found(self) -> bool {
        self.0.is_some()
    }

    /// Boolean or flag value, `false` otherwise.
    pub fn as_bool(self) -> bool {
        self.0.is_some_and(Value::as_bool)
    }

    /// Integer value, `0` otherwise.
    pub fn as_int(self) -> i64 {
        self.0.map_or(0, Value::as_int)
    }

    /// Double value, `0.0` otherwise.
    pub fn as_double(self) -> f64 {
        self.0.map_or(0.0, Value::as_double)
    }

    /// String value, empty otherwise.
    pub fn as_str(self) -> &'v str {
        self.0.and_then(Value::as_str).unwrap_or("")
    }
}

/// Merged option and argument values of a resolved chain.
#[derive(Debug, Clone, Default)]
pub struct Bindings<'a> {
    options: Vec<BoundOption<'a>>,
    arguments: Vec<BoundArgument<'a>>,
}

impl<'a> Bindings<'a> {
    /// Builds the merged table for `chain`.
    ///
    /// Options are de-duplicated by `(name, short_name)` with the first
    /// declaration kept; arguments are concatenated root first. An empty
    /// chain still binds the built-in help flag.
    pub fn for_chain(chain: &[&'a Command]) -> Self {
        let mut bindings = Self::default();
        if chain.is_empty() {
            let help: &'static OptionSpec = &DETACHED_HELP;
            bindings.options.push(Bound {
                spec: help,
                value: help.value.clone(),
            });
        }
        for command in chain {
            for spec in &command.options {
                if bindings
                    .options
                    .iter()
                    .any(|bound| bound.spec.same_identity(spec))
                {
                    continue;
                }
                bindings.options.push(Bound {
                    spec,
                    value: spec.value.clone(),
                });
            }
            bindings
                .arguments
                .extend(command.arguments.iter().map(|spec| Bound {
                    spec,
                    value: spec.value.clone(),
                }));
        }
        bindings
    }

    /// Merged options in declaration order.
    pub fn options(&self) -> &[BoundOption<'a>] {
        &self.options
    }

    /// Merged arguments in declaration order.
    pub fn arguments(&self) -> &[BoundArgument<'a>] {
        &self.arguments
    }

    pub(crate) fn options_mut(&mut self) -> &mut [BoundOption<'a>] {
        &mut self.options
    }

    /// The trailing `count` arguments, which belong to the leaf command.
    pub(crate) fn leaf_arguments_mut(&mut self, count: usize) -> &mut [BoundArgument<'a>] {
        let start = self.arguments.len().saturating_sub(count);
        &mut self.arguments[start..]
    }

    /// Looks up an option by long or short name.
    pub fn option(&self, name: &str) -> Lookup<'_> {
        Lookup(
            self.options
                .iter()
                .find(|bound| bound.is_named(name))
                .map(|bound| &bound.value),
        )
    }

    /// Looks up an argument by name. The last declaration wins, so a leaf
    /// argument shadows a same-named parent argument.
    pub fn argument(&self, name: &str) -> Lookup<'_> {
        Lookup(
            self.arguments
                .iter()
                .rev()
                .find(|bound| bound.is_named(name))
                .map(|bound| &bound.value),
        )
    }
}

/// Parses `text` into `value` on behalf of option or argument `name`.
///
/// Outside strict mode a token that does not scan, or one fed to a flag,
/// leaves the value as it was.
pub(crate) fn assign(
    value: &mut Value,
    name: &str,
    text: &str,
    strict: bool,
) -> Result<(), ExecError> {
    let kind = value.kind();
    let invalid = || ExecError::InvalidValue {
        name: name.to_string(),
        kind,
        text: text.to_string(),
    };
    match value.parse(text) {
        Ok(Parsed::Updated) => Ok(()),
        Ok(Parsed::Kept) | Err(_) if strict => Err(invalid()),
        Ok(Parsed::Kept) | Err(_) => {
            warn!(
                name,
                %kind,
                token = text,
                "Token not readable as declared kind; keeping previous value"
            );
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain_commands() -> (Command, Command) {
        let root = Command::new("app", None, "")
            .with_option(OptionSpec::string("name", Some("n"), Some("root"), None, ""))
            .with_argument(ArgumentSpec::string("target", Some("parent"), None, ""));
        let child = Command::new("sub", None, "")
            .with_option(OptionSpec::string("name", Some("n"), Some("child"), None, ""))
            .with_option(OptionSpec::integer("count", Some("c"), 3, 3, ""))
            .with_argument(ArgumentSpec::string("target", Some("leaf"), None, ""));
        (root, child)
    }

    #[test]
    fn test_for_chain_deduplicates_options_first_wins() {
        let (root, child) = chain_commands();
        let bindings = Bindings::for_chain(&[&root, &child]);

        let names: Vec<_> = bindings
            .options()
            .iter()
            .map(|b| b.spec.name.as_str())
            .collect();
        assert_eq!(names, vec!["help", "name", "count"]);
        assert_eq!(bindings.option("name").as_str(), "root");
        assert_eq!(bindings.option("c").as_int(), 3);
    }

    #[test]
    fn test_for_chain_concatenates_arguments() {
        let (root, child) = chain_commands();
        let mut bindings = Bindings::for_chain(&[&root, &child]);
        assert_eq!(bindings.arguments().len(), 2);
        assert_eq!(bindings.argument("target").as_str(), "leaf");
        assert_eq!(bindings.leaf_arguments_mut(1)[0].value.as_str(), Some("leaf"));
    }

    #[test]
    fn test_empty_chain_binds_help_only() {
        let bindings = Bindings::for_chain(&[]);
        assert_eq!(bindings.options().len(), 1);
        assert!(bindings.option("h").is_found());
        assert!(bindings.arguments().is_empty());
    }

    #[test]
    fn test_lookup_sentinels() {
        let bindings = Bindings::default();
        assert!(!bindings.option("x").as_bool());
        assert_eq!(bindings.argument("x").as_double(), 0.0);
        assert!(bindings.argument("x").value().is_none());
    }

    #[test]
    fn test_assign_permissive_keeps_value() {
        let mut value = Value::Integer(4);
        assign(&mut value, "count", "four", false).unwrap();
        assert_eq!(value, Value::Integer(4));

        let mut flag = Value::Flag(false);
        assign(&mut flag, "switch", "1", false).unwrap();
        assert_eq!(flag, Value::Flag(false));
    }

    #[test]
    fn test_assign_strict_rejects_unreadable_tokens() {
        let mut value = Value::Double(1.0);
        let err = assign(&mut value, "ratio", "half", true).unwrap_err();
        assert_eq!(err.to_string(), "Invalid double value 'half' for ratio.");
    }
}
