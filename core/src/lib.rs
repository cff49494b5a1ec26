//! Command tree definition and argument parsing.
//!
//! This crate models a CLI as a tree of commands and runs raw argument
//! vectors against it:
//!
//! - [`Command`] — a node with options, positional arguments, sub-commands
//!   and an optional [`Handler`].
//! - [`OptionSpec`] / [`ArgumentSpec`] — typed declarations holding a
//!   [`Value`] and its default.
//! - [`resolve_chain`], [`parse_options`], [`parse_arguments`] — the three
//!   stages that consume a shared [`Tokens`] buffer.
//! - [`Executor`] — runs the stages, the help check and handler dispatch,
//!   returning an [`Outcome`] or an [`ExecFailure`].
//!
//! Every invocation binds values into a fresh [`Bindings`] table, so a tree
//! can be executed any number of times. Trees can also be declared in YAML
//! or JSON ([`TreeFile`]) and checked with [`validate_command`].
//!
//! # Example
//!
//! ```
//! use cmdtree_core::*;
//!
//! let app = Command::new("app", None, "Demo")
//!     .with_subcommand(
//!         Command::new("copy", Some("cp"), "Copy a file")
//!             .with_option(OptionSpec::flag("force", Some("f"), false, false, "Overwrite"))
//!             .with_argument(ArgumentSpec::string("src", None, None, "Source"))
//!             .with_argument(ArgumentSpec::string("dst", None, None, "Destination"))
//!             .with_handler(|inv: &Invocation<'_>| -> HandlerResult {
//!                 let b = inv.bindings;
//!                 Ok(Output::text(format!(
//!                     "{} -> {} (force: {})",
//!                     b.argument("src").as_str(),
//!                     b.argument("dst").as_str(),
//!                     b.option("force").as_bool(),
//!                 )))
//!             }),
//!     );
//! assert!(validate_command(&app).is_empty());
//!
//! let outcome = app.exec(["app", "-f", "cp", "a.txt", "b.txt"]).unwrap();
//! assert_eq!(
//!     outcome.outputs().next(),
//!     Some(&Output::text("a.txt -> b.txt (force: true)"))
//! );
//!
//! let failure = app.exec(["app", "cp", "a", "b", "c"]).unwrap_err();
//! assert_eq!(failure.to_string(), "1 extra arguments found.");
//! assert_eq!(failure.code(), 6);
//! ```

mod arguments;
mod bindings;
mod command;
mod config;
mod error;
mod exec;
mod help;
mod options;
mod output;
mod resolve;
mod spec;
mod tokens;
mod validate;
mod value;

pub use arguments::parse_arguments;
pub use bindings::{Bindings, Bound, BoundArgument, BoundOption, Lookup};
pub use command::{Command, Handler, HandlerResult, Invocation};
pub use config::{ArgumentDecl, CommandDecl, ConfigError, OptionDecl, Scalar, TreeFile};
pub use error::{ErrorKind, ExecError, ExecFailure, HandlerError};
pub use exec::{Dispatch, ExecSettings, Executor, Outcome};
pub use help::{help_text, program_name, short_program_name};
pub use options::parse_options;
pub use output::{Dict, MultiProgress, Output, OutputError, Progress, ResultKind, Table};
pub use resolve::resolve_chain;
pub use spec::{
    ArgumentSpec, HELP_DESCRIPTION, HELP_LONG, HELP_SHORT, Named, OptionSpec, get_by_name,
};
pub use tokens::Tokens;
pub use validate::{ValidationError, validate_command};
pub use value::{Parsed, Value, ValueError, ValueKind};
