//! Usage and help text for a resolved chain.

use std::fmt::Write as _;

use crate::command::Command;
use crate::value::ValueKind;

const OPTION_COLUMN: usize = 25;
const COMMAND_COLUMN: usize = 13;

fn basename(name: &str) -> &str {
    name.rsplit(['/', '\\']).next().unwrap_or(name)
}

/// Chain names joined by spaces, with any path prefix stripped.
///
/// # Examples
///
/// ```
/// use cmdtree_core::{Command, program_name};
///
/// let root = Command::new("/usr/local/bin/tool", Some("t"), "");
/// let sub = Command::new("build", Some("b"), "");
/// assert_eq!(program_name(&[&root, &sub]), "tool build");
/// ```
pub fn program_name(chain: &[&Command]) -> String {
    chain
        .iter()
        .map(|command| basename(&command.name))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Like [`program_name`] but with short names, falling back to the name.
pub fn short_program_name(chain: &[&Command]) -> String {
    chain
        .iter()
        .map(|command| basename(command.short_name.as_deref().unwrap_or(&command.name)))
        .collect::<Vec<_>>()
        .join(" ")
}

fn usage_suffix(command: &Command) -> String {
    let mut suffix = String::new();
    if !command.options.is_empty() {
        suffix.push_str(" [OPTIONS]");
    }
    if !command.subcommands.is_empty() {
        suffix.push_str(" COMMAND");
    }
    for argument in &command.arguments {
        let _ = write!(suffix, " <{}>", argument.name);
    }
    suffix
}

/// Generated help for the last command of `chain`, or `None` when the
/// chain is empty.
///
/// # Examples
///
/// ```
/// use cmdtree_core::{ArgumentSpec, Command, help_text};
///
/// let root = Command::new("app", Some("a"), "Demo")
///     .with_argument(ArgumentSpec::string("file", None, None, "Input"));
/// let help = help_text(&[&root]).unwrap();
/// assert!(help.starts_with("Usage: app [OPTIONS] <file>\nOR:    a [OPTIONS] <file>\n\nDemo\n\n"));
/// assert!(help.contains("\t-h, --help"));
/// ```
pub fn help_text(chain: &[&Command]) -> Option<String> {
    let command = chain.last()?;
    let suffix = usage_suffix(command);

    let mut help = String::new();
    let _ = write!(help, "Usage: {}{suffix}", program_name(chain));
    let _ = write!(help, "\nOR:    {}{suffix}", short_program_name(chain));
    let _ = write!(help, "\n\n{}\n\n", command.description);

    if !command.options.is_empty() {
        help.push_str("Options:\n\n");
        for option in &command.options {
            help.push('\t');
            match &option.short_name {
                Some(short) => {
                    let _ = write!(help, "-{short}, ");
                }
                None => help.push_str("    "),
            }
            let mut long = format!("--{}", option.name);
            if option.kind() == ValueKind::String {
                long.push_str(" string");
            }
            let _ = writeln!(help, "{long:<OPTION_COLUMN$}{}", option.description);
        }
        help.push('\n');
    }

    if !command.subcommands.is_empty() {
        help.push_str("\nCommands:\n\n");
        for subcommand in &command.subcommands {
            let _ = writeln!(
                help,
                "  {:<COMMAND_COLUMN$}{}",
                subcommand.name, subcommand.description
            );
        }
        help.push('\n');
    }

    Some(help)
}
