//! Command tree validation.
//!
//! Catches structural defects before a tree is executed: empty or malformed
//! names, duplicates within one scope, options that change meaning down a
//! chain, and value/default kind mismatches.
//!
//! # Examples
//!
//! ```
//! use cmdtree_core::*;
//!
//! let app = Command::new("git", None, "")
//!     .with_option(OptionSpec::flag("verbose", Some("v"), false, false, ""));
//! assert!(validate_command(&app).is_empty());
//!
//! // Invalid: option name carries its own dashes
//! let bad = Command::new("git", None, "")
//!     .with_option(OptionSpec::flag("--verbose", None, false, false, ""));
//! assert!(!validate_command(&bad).is_empty());
//! ```

use std::collections::HashSet;

use thiserror::Error;

use crate::command::Command;
use crate::spec::OptionSpec;
use crate::value::ValueKind;

/// Command tree validation errors.
///
/// Each variant describes a specific structural problem. The `Display`
/// impl provides a human-readable message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Command name is empty or whitespace-only.
    #[error("command name cannot be empty")]
    EmptyCommandName,
    /// An option or argument name is empty.
    #[error("empty {0} name in command {1}")]
    EmptyName(&'static str, String),
    /// Option name starts with `-` or contains whitespace.
    #[error("invalid option name: {0}")]
    InvalidOptionName(String),
    /// Two options in one command share a long or short name.
    #[error("duplicate option in command {command}: {name}")]
    DuplicateOption { command: String, name: String },
    /// Two arguments in one command share a name.
    #[error("duplicate argument in command {command}: {name}")]
    DuplicateArgument { command: String, name: String },
    /// Two sibling sub-commands share a name or short name.
    #[error("duplicate subcommand in scope: {0}")]
    DuplicateSubcommand(String),
    /// A sub-command redeclares an ancestor option with another kind or
    /// short name, or reuses an ancestor's short name for another option.
    #[error("option {option} in {path} conflicts with an ancestor declaration")]
    ConflictingOption { path: String, option: String },
    /// Current and default values differ in kind.
    #[error("{name}: value is {expected} but default is {found}")]
    KindMismatch {
        name: String,
        expected: ValueKind,
        found: ValueKind,
    },
}

/// Validates a command tree.
///
/// Stops at the first defect found, walking the tree depth first.
///
/// # Examples
///
/// ```
/// use cmdtree_core::*;
///
/// // A child may repeat a parent option only with the same shape.
/// let app = Command::new("app", None, "")
///     .with_option(OptionSpec::string("name", Some("n"), None, None, ""))
///     .with_subcommand(
///         Command::new("sub", None, "")
///             .with_option(OptionSpec::integer("name", Some("n"), 0, 0, "")),
///     );
/// let errors = validate_command(&app);
/// assert!(matches!(errors[..], [ValidationError::ConflictingOption { .. }]));
/// ```
pub fn validate_command(command: &Command) -> Vec<ValidationError> {
    let mut path = Vec::new();
    let mut inherited = Vec::new();
    validate_node(command, &mut path, &mut inherited)
}

fn validate_node<'a>(
    command: &'a Command,
    path: &mut Vec<&'a str>,
    inherited: &mut Vec<&'a OptionSpec>,
) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if command.name.trim().is_empty() {
        errors.push(ValidationError::EmptyCommandName);
        return errors;
    }
    path.push(&command.name);

    errors.extend(validate_options(command, path, inherited));
    if errors.is_empty() {
        errors.extend(validate_arguments(command));
    }
    if !errors.is_empty() {
        return errors;
    }

    let depth = inherited.len();
    inherited.extend(command.options.iter());

    let mut seen: HashSet<&str> = HashSet::new();
    for sub in &command.subcommands {
        let duplicate = std::iter::once(sub.name.as_str())
            .chain(sub.short_name.as_deref())
            .find(|name| !seen.insert(*name));
        if let Some(name) = duplicate {
            errors.push(ValidationError::DuplicateSubcommand(name.to_string()));
            return errors;
        }

        errors.extend(validate_node(sub, path, inherited));
        if !errors.is_empty() {
            return errors;
        }
    }

    inherited.truncate(depth);
    path.pop();
    errors
}

fn validate_options(
    command: &Command,
    path: &[&str],
    inherited: &[&OptionSpec],
) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let mut seen = HashSet::new();

    for option in &command.options {
        if option.name.is_empty() {
            errors.push(ValidationError::EmptyName("option", command.name.clone()));
            return errors;
        }

        let names = std::iter::once((true, &option.name))
            .chain(option.short_name.iter().map(|short| (false, short)));
        for (long, name) in names {
            if name.is_empty() || name.starts_with('-') || name.contains(char::is_whitespace) {
                errors.push(ValidationError::InvalidOptionName(name.clone()));
                return errors;
            }
            // Long and short names are looked up separately.
            if !seen.insert((long, name.as_str())) {
                errors.push(ValidationError::DuplicateOption {
                    command: command.name.clone(),
                    name: name.clone(),
                });
                return errors;
            }
        }

        if option.value.kind() != option.default_value.kind() {
            errors.push(ValidationError::KindMismatch {
                name: option.name.clone(),
                expected: option.value.kind(),
                found: option.default_value.kind(),
            });
            return errors;
        }

        let conflict = inherited.iter().any(|ancestor| {
            let same_long = ancestor.name == option.name;
            let same_short =
                option.short_name.is_some() && ancestor.short_name == option.short_name;
            // A short name may only be reused by a redeclaration of the same option.
            if same_long {
                ancestor.kind() != option.kind() || ancestor.short_name != option.short_name
            } else {
                same_short
            }
        });
        if conflict {
            errors.push(ValidationError::ConflictingOption {
                path: path.join(" "),
                option: option.name.clone(),
            });
            return errors;
        }
    }

    errors
}

fn validate_arguments(command: &Command) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let mut seen = HashSet::new();

    for argument in &command.arguments {
        if argument.name.trim().is_empty() {
            errors.push(ValidationError::EmptyName("argument", command.name.clone()));
            return errors;
        }
        if !seen.insert(argument.name.as_str()) {
            errors.push(ValidationError::DuplicateArgument {
                command: command.name.clone(),
                name: argument.name.clone(),
            });
            return errors;
        }
        if argument.value.kind() != argument.default_value.kind() {
            errors.push(ValidationError::KindMismatch {
                name: argument.name.clone(),
                expected: argument.value.kind(),
                found: argument.default_value.kind(),
            });
            return errors;
        }
    }

    errors
}
