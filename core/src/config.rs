//! Declarative command tree files.
//!
//! A tree file describes commands, options and arguments without handlers,
//! plus the [`ExecSettings`] to run them with. YAML and JSON are accepted;
//! the format follows the file extension (`.json`, anything else is YAML).
//!
//! # Example YAML
//!
//! ```yaml
//! settings:
//!   strict_arity: true
//! command:
//!   name: git
//!   description: Version control
//!   options:
//!     - name: verbose
//!       short: v
//!       kind: flag
//!       description: Talk more
//!   commands:
//!     - name: clone
//!       short_name: cl
//!       arguments:
//!         - name: url
//!           kind: string
//!         - name: depth
//!           kind: integer
//!           default: 1
//!           optional: true
//!         - name: dir
//!           kind: string
//!           unset: true
//!           default: repo
//! ```

use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::command::Command;
use crate::exec::ExecSettings;
use crate::spec::{ArgumentSpec, OptionSpec};
use crate::validate::{ValidationError, validate_command};
use crate::value::{Parsed, Value, ValueKind};

/// Errors raised while reading, writing or building a tree file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing or serialization failure.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parsing or serialization failure.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A literal does not fit the declared kind.
    #[error("invalid {kind} literal for {name}: {literal}")]
    InvalidValue {
        name: String,
        kind: ValueKind,
        literal: String,
    },

    /// The built tree failed validation.
    #[error("invalid command tree: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Convenience alias for results with [`ConfigError`].
pub type Result<T> = std::result::Result<T, ConfigError>;

/// A literal as written in a tree file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl std::fmt::Display for Scalar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Scalar::Bool(b) => write!(f, "{b}"),
            Scalar::Int(i) => write!(f, "{i}"),
            Scalar::Float(x) => write!(f, "{x}"),
            Scalar::Text(s) => f.write_str(s),
        }
    }
}

impl Scalar {
    fn to_value(&self, name: &str, kind: ValueKind) -> Result<Value> {
        let invalid = || ConfigError::InvalidValue {
            name: name.to_string(),
            kind,
            literal: self.to_string(),
        };
        let value = match (kind, self) {
            (ValueKind::Boolean, Scalar::Bool(b)) => Value::Boolean(*b),
            (ValueKind::Boolean, Scalar::Int(i)) => Value::Boolean(*i > 0),
            (ValueKind::Flag, Scalar::Bool(b)) => Value::Flag(*b),
            (ValueKind::Integer, Scalar::Int(i)) => Value::Integer(*i),
            (ValueKind::Double, Scalar::Float(x)) => Value::Double(*x),
            (ValueKind::Double, Scalar::Int(i)) => Value::Double(*i as f64),
            (ValueKind::String, Scalar::Text(s)) => Value::String(Some(s.clone())),
            (ValueKind::String, other) => Value::String(Some(other.to_string())),
            (ValueKind::Flag, _) => return Err(invalid()),
            (_, Scalar::Text(text)) => {
                let mut value = Value::unset(kind);
                match value.parse(text) {
                    Ok(Parsed::Updated) => value,
                    _ => return Err(invalid()),
                }
            }
            _ => return Err(invalid()),
        };
        Ok(value)
    }

    fn from_value(value: &Value) -> Option<Self> {
        Some(match value {
            Value::Boolean(b) | Value::Flag(b) => Scalar::Bool(*b),
            Value::Integer(i) => Scalar::Int(*i),
            Value::Double(x) => Scalar::Float(*x),
            Value::String(s) => Scalar::Text(s.clone()?),
        })
    }
}

/// Current and default value of a declaration. The current value comes from
/// `value`, else is unset when `unset` is given, else copies the default.
fn resolve_values(
    name: &str,
    kind: ValueKind,
    value: Option<&Scalar>,
    unset: bool,
    default: Option<&Scalar>,
) -> Result<(Value, Value)> {
    let default_value = match default {
        Some(literal) => literal.to_value(name, kind)?,
        None => Value::unset(kind),
    };
    let value = match value {
        Some(literal) => literal.to_value(name, kind)?,
        None if unset => Value::unset(kind),
        None => default_value.clone(),
    };
    Ok((value, default_value))
}

/// Literal for a current value that differs from its default, and whether
/// it has to be written as unset because no literal can express it.
fn describe_value(value: &Value, default_value: &Value) -> (Option<Scalar>, bool) {
    if value == default_value {
        return (None, false);
    }
    match Scalar::from_value(value) {
        Some(literal) => (Some(literal), false),
        None => (None, true),
    }
}

fn is_false(flag: &bool) -> bool {
    !*flag
}

/// One option of a command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionDecl {
    /// Long name, matched by `--name`.
    pub name: String,
    /// Short name, matched by `-s`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short: Option<String>,
    /// Type of the value; `flag` options take no value token.
    pub kind: ValueKind,
    /// Starting value; falls back to `default`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Scalar>,
    /// Start with no value even though `default` is set. Only string
    /// options can be in that state.
    #[serde(default, skip_serializing_if = "is_false")]
    pub unset: bool,
    /// Declared default; unset when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Scalar>,
    /// Shown in help.
    #[serde(default)]
    pub description: String,
}

/// One positional argument of a command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArgumentDecl {
    /// Name shown as `<name>` in help and used for lookups.
    pub name: String,
    /// Type the bound token is read as.
    pub kind: ValueKind,
    /// Value used when no token binds the argument; falls back to `default`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Scalar>,
    /// See [`OptionDecl::unset`].
    #[serde(default, skip_serializing_if = "is_false")]
    pub unset: bool,
    /// Declared default; unset when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Scalar>,
    /// Shown in help.
    #[serde(default)]
    pub description: String,
    /// Never reported missing under `strict_arity`.
    #[serde(default)]
    pub optional: bool,
}

/// A command and its children.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandDecl {
    /// Name matched against tokens; a root may carry a path.
    pub name: String,
    /// Alternative name, also used on the help `OR:` line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_name: Option<String>,
    /// Shown in help, under the usage lines.
    #[serde(default)]
    pub description: String,
    /// Options, inherited by every sub-command.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<OptionDecl>,
    /// Positional arguments, bound only when this command is the leaf.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub arguments: Vec<ArgumentDecl>,
    /// Sub-commands, in help order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub commands: Vec<CommandDecl>,
}

impl CommandDecl {
    /// Builds the command tree, without checking it.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for a literal that does not fit
    /// its kind.
    pub fn to_command(&self) -> Result<Command> {
        let mut command = Command::new(
            &self.name,
            self.short_name.as_deref(),
            &self.description,
        );
        for decl in &self.options {
            let (value, default_value) = resolve_values(
                &decl.name,
                decl.kind,
                decl.value.as_ref(),
                decl.unset,
                decl.default.as_ref(),
            )?;
            command.options.push(OptionSpec {
                name: decl.name.clone(),
                short_name: decl.short.clone(),
                value,
                default_value,
                description: decl.description.clone(),
            });
        }
        for decl in &self.arguments {
            let (value, default_value) = resolve_values(
                &decl.name,
                decl.kind,
                decl.value.as_ref(),
                decl.unset,
                decl.default.as_ref(),
            )?;
            command.arguments.push(ArgumentSpec {
                name: decl.name.clone(),
                value,
                default_value,
                description: decl.description.clone(),
                optional: decl.optional,
            });
        }
        for child in &self.commands {
            command.subcommands.push(child.to_command()?);
        }
        Ok(command)
    }

    /// Describes an existing tree. The built-in help option is left out.
    pub fn from_command(command: &Command) -> Self {
        let options = command
            .user_options()
            .map(|option| {
                let (value, unset) = describe_value(&option.value, &option.default_value);
                OptionDecl {
                    name: option.name.clone(),
                    short: option.short_name.clone(),
                    kind: option.kind(),
                    value,
                    unset,
                    default: Scalar::from_value(&option.default_value),
                    description: option.description.clone(),
                }
            })
            .collect();
        let arguments = command
            .arguments
            .iter()
            .map(|argument| {
                let (value, unset) = describe_value(&argument.value, &argument.default_value);
                ArgumentDecl {
                    name: argument.name.clone(),
                    kind: argument.kind(),
                    value,
                    unset,
                    default: Scalar::from_value(&argument.default_value),
                    description: argument.description.clone(),
                    optional: argument.optional,
                }
            })
            .collect();
        Self {
            name: command.name.clone(),
            short_name: command.short_name.clone(),
            description: command.description.clone(),
            options,
            arguments,
            commands: command.subcommands.iter().map(Self::from_command).collect(),
        }
    }
}

/// A tree file: settings plus the root command.
///
/// # Examples
///
/// ```
/// use cmdtree_core::TreeFile;
///
/// let yaml = "
/// command:
///   name: tool
///   options:
///     - name: level
///       short: l
///       kind: integer
///       default: 2
/// ";
/// let tree = TreeFile::from_yaml_str(yaml).unwrap();
/// let root = tree.build().unwrap();
/// assert_eq!(root.get_option("l").unwrap().value.as_int(), 2);
/// assert!(!tree.settings.strict_arity);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeFile {
    /// Parsing strictness for runs of this tree.
    #[serde(default)]
    pub settings: ExecSettings,
    /// Root command.
    pub command: CommandDecl,
}

impl TreeFile {
    /// Wraps an existing tree with default settings.
    pub fn from_command(command: &Command) -> Self {
        Self {
            settings: ExecSettings::default(),
            command: CommandDecl::from_command(command),
        }
    }

    /// Parses YAML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if parsing fails.
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(text)?)
    }

    /// Parses JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Json`] if parsing fails.
    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Loads a tree file, choosing the format by extension.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or a parse
    /// error for the detected format.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let reader = BufReader::new(std::fs::File::open(path)?);
        let tree = if is_json(path) {
            serde_json::from_reader(reader)?
        } else {
            serde_yaml::from_reader(reader)?
        };
        Ok(tree)
    }

    /// Saves the tree file, choosing the format by extension.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be written, or a
    /// serialization error.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let writer = BufWriter::new(std::fs::File::create(path)?);
        if is_json(path) {
            serde_json::to_writer_pretty(writer, self)?;
        } else {
            serde_yaml::to_writer(writer, self)?;
        }
        Ok(())
    }

    /// Builds and validates the command tree.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for an ill-typed literal or
    /// [`ConfigError::Validation`] when the tree is malformed.
    pub fn build(&self) -> Result<Command> {
        let command = self.command.to_command()?;
        let errors = validate_command(&command);
        if errors.is_empty() {
            Ok(command)
        } else {
            Err(ConfigError::Validation(errors))
        }
    }
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_yaml() -> &'static str {
        r#"
settings:
  strict_values: true
command:
  name: git
  short_name: g
  description: Version control
  options:
    - name: verbose
      short: v
      kind: flag
      description: Talk more
  commands:
    - name: clone
      description: Clone a repository
      options:
        - name: branch
          short: b
          kind: string
          default: main
      arguments:
        - name: url
          kind: string
        - name: depth
          kind: integer
          default: "3"
          optional: true
"#
    }

    #[test]
    fn test_yaml_builds_tree() {
        let tree = TreeFile::from_yaml_str(sample_yaml()).unwrap();
        assert!(tree.settings.strict_values);
        assert!(!tree.settings.strict_arity);

        let root = tree.build().unwrap();
        assert_eq!(root.short_name.as_deref(), Some("g"));
        assert_eq!(root.options.len(), 2);

        let clone = root.find_subcommand("clone").unwrap();
        assert_eq!(clone.get_option("b").unwrap().value.as_str(), Some("main"));
        let depth = clone.get_argument("depth").unwrap();
        assert_eq!(depth.value, Value::Integer(3));
        assert!(depth.optional);
        assert_eq!(clone.get_argument("url").unwrap().value, Value::String(None));
    }

    #[test]
    fn test_ill_typed_literal_is_rejected() {
        let yaml = "
command:
  name: x
  options:
    - name: n
      kind: integer
      default: lots
";
        let err = TreeFile::from_yaml_str(yaml).unwrap().build().unwrap_err();
        assert_eq!(err.to_string(), "invalid integer literal for n: lots");
    }

    #[test]
    fn test_validation_errors_surface() {
        let yaml = "
command:
  name: x
  commands:
    - name: a
    - name: a
";
        let err = TreeFile::from_yaml_str(yaml).unwrap().build().unwrap_err();
        assert!(matches!(err, ConfigError::Validation(ref errors) if errors.len() == 1));
        assert_eq!(
            err.to_string(),
            "invalid command tree: duplicate subcommand in scope: a"
        );
    }

    #[test]
    fn test_from_command_skips_help_and_round_trips() {
        let tree = TreeFile::from_yaml_str(sample_yaml()).unwrap();
        let root = tree.build().unwrap();
        let described = CommandDecl::from_command(&root);
        assert!(described.options.iter().all(|o| o.name != "help"));
        assert_eq!(described.to_command().unwrap().options, root.options);
    }

    #[test]
    fn test_unset_value_survives_a_round_trip() {
        let root = Command::new("tool", None, "")
            .with_option(OptionSpec::string("output", Some("o"), None, Some("out.txt"), ""))
            .with_argument(ArgumentSpec::string("dst", None, Some("b.txt"), ""));
        let tree = TreeFile::from_command(&root);
        assert!(tree.command.options[0].unset);
        assert!(tree.command.arguments[0].unset);

        let yaml = serde_yaml::to_string(&tree).unwrap();
        assert!(yaml.contains("unset: true"));
        let rebuilt = TreeFile::from_yaml_str(&yaml).unwrap().build().unwrap();
        let output = rebuilt.get_option("o").unwrap();
        assert_eq!(output.value, Value::String(None));
        assert_eq!(output.default_value, Value::String(Some("out.txt".into())));
        assert_eq!(rebuilt.options, root.options);
        assert_eq!(rebuilt.arguments, root.arguments);
    }

    #[test]
    fn test_literal_value_wins_over_unset() {
        let yaml = "
command:
  name: x
  options:
    - name: out
      kind: string
      value: a
      unset: true
      default: b
";
        let root = TreeFile::from_yaml_str(yaml).unwrap().build().unwrap();
        assert_eq!(root.get_option("out").unwrap().value.as_str(), Some("a"));
    }

    #[test]
    fn test_json_parses() {
        let json = r#"{"command": {"name": "x", "arguments": [{"name": "n", "kind": "double", "default": 2}]}}"#;
        let root = TreeFile::from_json_str(json).unwrap().build().unwrap();
        assert_eq!(root.arguments[0].value, Value::Double(2.0));
    }

    #[test]
    fn test_save_and_load_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let tree = TreeFile::from_yaml_str(sample_yaml()).unwrap();
        for name in ["tree.yaml", "tree.json"] {
            let path = dir.path().join(name);
            tree.save(&path).unwrap();
            assert_eq!(TreeFile::load(&path).unwrap(), tree);
        }
        let raw = std::fs::read_to_string(dir.path().join("tree.json")).unwrap();
        assert!(raw.trim_start().starts_with('{'));
    }
}
