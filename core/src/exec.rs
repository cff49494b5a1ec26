//! The execution pipeline.
//!
//! One call runs resolve, option parsing, the help check, argument binding
//! and handler dispatch against a fresh [`Bindings`] table:
//!
//! ```text
//! tokens ─► resolve_chain ─► parse_options ─► help? ─► parse_arguments ─► handlers
//!                                               │        (leaf only)
//!                                               └─► Outcome::Help
//! ```
//!
//! Parent handlers run before the leaf's arguments are bound, so a binding
//! failure still reports what the parents returned (see
//! [`ExecFailure::dispatched`]).

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::arguments::parse_arguments;
use crate::bindings::Bindings;
use crate::command::{Command, HandlerResult, Invocation};
use crate::error::{ErrorKind, ExecError, ExecFailure};
use crate::help::help_text;
use crate::options::parse_options;
use crate::output::Output;
use crate::resolve::resolve_chain;
use crate::spec::HELP_LONG;
use crate::tokens::Tokens;

/// Parsing strictness.
///
/// Both switches default to `false`, which keeps the lenient behaviour:
/// missing arguments are left at their declared values and unreadable
/// numbers keep the previous value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecSettings {
    /// Fail with [`ExecError::ArgumentMissing`] when a required leaf
    /// argument gets no token.
    pub strict_arity: bool,
    /// Fail with [`ExecError::InvalidValue`] when a token cannot be read as
    /// the declared kind.
    pub strict_values: bool,
}

/// What one handler returned.
#[derive(Debug, Clone, PartialEq)]
pub struct Dispatch {
    /// Name of the command whose handler ran.
    pub command: String,
    /// The handler's result.
    pub result: HandlerResult,
}

/// Successful end of an invocation.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Help was requested; no argument was bound and no handler ran.
    Help(String),
    /// Every handler of the chain ran, root first.
    Completed(Vec<Dispatch>),
}

impl Outcome {
    /// Overall status: the kind of the last failing handler, or success.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Outcome::Help(_) => ErrorKind::Success,
            Outcome::Completed(dispatched) => dispatched
                .iter()
                .rev()
                .find_map(|dispatch| dispatch.result.as_ref().err())
                .map_or(ErrorKind::Success, |err| err.kind),
        }
    }

    /// Numeric code of [`kind`](Outcome::kind).
    pub fn code(&self) -> i32 {
        self.kind().code()
    }

    /// Outputs of the handlers that succeeded, in dispatch order.
    pub fn outputs(&self) -> impl Iterator<Item = &Output> {
        let dispatched = match self {
            Outcome::Help(_) => &[][..],
            Outcome::Completed(dispatched) => dispatched.as_slice(),
        };
        dispatched
            .iter()
            .filter_map(|dispatch| dispatch.result.as_ref().ok())
    }
}

/// Runs command trees against argument vectors.
///
/// The tree is only read, so one executor can serve any number of
/// invocations, for example from a REPL.
///
/// # Examples
///
/// ```
/// use cmdtree_core::{ArgumentSpec, Command, Executor, HandlerResult, Invocation, Outcome, Output};
///
/// let root = Command::new("greet", None, "Say hello")
///     .with_argument(ArgumentSpec::string("who", Some("world"), None, "Who"))
///     .with_handler(|inv: &Invocation<'_>| -> HandlerResult {
///         Ok(Output::text(format!("hello {}", inv.bindings.argument("who").as_str())))
///     });
/// let roots = [root];
/// let executor = Executor::new(&roots);
///
/// let outcome = executor.exec(["greet", "ada"]).unwrap();
/// assert_eq!(outcome.outputs().next(), Some(&Output::text("hello ada")));
///
/// // Declared values are untouched by the previous run.
/// let outcome = executor.exec(["greet"]).unwrap();
/// assert_eq!(outcome.outputs().next(), Some(&Output::text("hello world")));
///
/// assert!(matches!(executor.exec(["greet", "-h"]).unwrap(), Outcome::Help(_)));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Executor<'a> {
    roots: &'a [Command],
    settings: ExecSettings,
}

impl<'a> Executor<'a> {
    /// Creates an executor over the given top-level commands.
    pub fn new(roots: &'a [Command]) -> Self {
        Self {
            roots,
            settings: ExecSettings::default(),
        }
    }

    /// Replaces the parsing settings.
    pub fn with_settings(mut self, settings: ExecSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Current settings.
    pub fn settings(&self) -> ExecSettings {
        self.settings
    }

    /// Top-level commands.
    pub fn roots(&self) -> &'a [Command] {
        self.roots
    }

    /// Executes one argument vector.
    ///
    /// # Errors
    ///
    /// Returns an [`ExecFailure`] for the first resolution or parse error.
    /// Handler failures are not errors here; they are reported through
    /// [`Outcome::kind`].
    pub fn exec<I, S>(&self, args: I) -> Result<Outcome, ExecFailure>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut tokens = Tokens::new(args);
        let chain = resolve_chain(self.roots, &mut tokens);
        debug!(depth = chain.len(), remaining = tokens.len(), "Resolved command chain");

        let failure = |error: ExecError| ExecFailure::new(error, help_text(&chain));
        let mut bindings = Bindings::for_chain(&chain);

        parse_options(bindings.options_mut(), &mut tokens, &self.settings).map_err(failure)?;

        if bindings.option(HELP_LONG).as_bool() {
            return help_text(&chain)
                .map(Outcome::Help)
                .ok_or_else(|| failure(ExecError::CommandNotFound));
        }

        let Some(last) = chain.len().checked_sub(1) else {
            return Err(failure(ExecError::CommandNotFound));
        };

        let mut dispatched = Vec::new();
        for (depth, &command) in chain.iter().enumerate() {
            if depth == last {
                let bound = bind_leaf(command, &mut bindings, &mut tokens, &self.settings);
                if let Err(error) = bound {
                    let mut report = failure(error);
                    report.dispatched = dispatched;
                    return Err(report);
                }
            }

            let Some(handler) = command.handler() else {
                continue;
            };
            let invocation = Invocation {
                command,
                chain: &chain,
                bindings: &bindings,
            };
            let result = handler.handle(&invocation);
            info!(command = %command.name, ok = result.is_ok(), "Handler finished");
            dispatched.push(Dispatch {
                command: command.name.clone(),
                result,
            });
        }

        Ok(Outcome::Completed(dispatched))
    }
}

fn bind_leaf(
    leaf: &Command,
    bindings: &mut Bindings<'_>,
    tokens: &mut Tokens,
    settings: &ExecSettings,
) -> Result<(), ExecError> {
    let arguments = bindings.leaf_arguments_mut(leaf.arguments.len());
    parse_arguments(arguments, tokens, settings)?;
    if tokens.is_empty() {
        Ok(())
    } else {
        Err(ExecError::ExtraArgumentsFound(tokens.len()))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::error::HandlerError;
    use crate::spec::{ArgumentSpec, OptionSpec};

    fn counting(counter: Arc<AtomicUsize>) -> impl Fn(&Invocation<'_>) -> HandlerResult {
        move |inv: &Invocation<'_>| -> HandlerResult {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(Output::text(inv.command.name.clone()))
        }
    }

    #[test]
    fn test_handlers_run_root_first() {
        let calls = Arc::new(AtomicUsize::new(0));
        let root = Command::new("app", None, "")
            .with_handler(counting(Arc::clone(&calls)))
            .with_subcommand(
                Command::new("sub", None, "").with_handler(counting(Arc::clone(&calls))),
            );
        let outcome = root.exec(["app", "sub"]).unwrap();

        let names: Vec<_> = outcome
            .outputs()
            .map(|output| match output {
                Output::Text(text) => text.as_str(),
                _ => "",
            })
            .collect();
        assert_eq!(names, ["app", "sub"]);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(outcome.code(), 0);
    }

    #[test]
    fn test_last_failing_handler_decides_kind() {
        let root = Command::new("app", None, "")
            .with_handler(|_: &Invocation<'_>| -> HandlerResult {
                Err(HandlerError::new(ErrorKind::ArgumentNotFound, "parent"))
            })
            .with_subcommand(Command::new("sub", None, "").with_handler(
                |_: &Invocation<'_>| -> HandlerResult { Ok(Output::text("leaf")) },
            ));
        let outcome = root.exec(["app", "sub"]).unwrap();
        assert_eq!(outcome.kind(), ErrorKind::ArgumentNotFound);
        assert_eq!(outcome.outputs().count(), 1);
    }

    #[test]
    fn test_help_skips_binding_and_handlers() {
        let calls = Arc::new(AtomicUsize::new(0));
        let root = Command::new("app", None, "Demo")
            .with_argument(ArgumentSpec::string("file", None, None, ""))
            .with_handler(counting(Arc::clone(&calls)));
        let outcome = root.exec(["app", "a", "b", "c", "--help"]).unwrap();
        assert!(matches!(outcome, Outcome::Help(ref text) if text.starts_with("Usage: app")));
        assert_eq!(outcome.code(), 0);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_empty_chain() {
        let root = Command::new("app", None, "");
        let err = root.exec(["other"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CommandNotFound);
        assert!(err.help.is_none());

        let err = root.exec(["other", "--help"]).unwrap_err();
        assert_eq!(err.error, ExecError::CommandNotFound);

        let err = root.exec(["--verbose"]).unwrap_err();
        assert_eq!(err.error, ExecError::UnknownOption("--verbose".into()));
    }

    #[test]
    fn test_binding_failure_keeps_parent_results() {
        let root = Command::new("app", None, "")
            .with_handler(|_: &Invocation<'_>| -> HandlerResult { Ok(Output::text("parent")) })
            .with_subcommand(Command::new("sub", None, "").with_argument(ArgumentSpec::string(
                "x", None, None, "",
            )));
        let err = root.exec(["app", "sub", "1", "2"]).unwrap_err();
        assert_eq!(err.error, ExecError::ExtraArgumentsFound(1));
        assert_eq!(err.dispatched.len(), 1);
        assert!(err.help.unwrap().starts_with("Usage: app sub"));
    }

    #[test]
    fn test_strict_settings_are_applied() {
        let root = Command::new("app", None, "")
            .with_option(OptionSpec::integer("n", None, 0, 0, ""))
            .with_argument(ArgumentSpec::string("x", None, None, ""));
        let roots = [root];
        let strict = Executor::new(&roots).with_settings(ExecSettings {
            strict_arity: true,
            strict_values: true,
        });
        assert_eq!(
            strict.exec(["app"]).unwrap_err().kind(),
            ErrorKind::ArgumentNotFound
        );
        assert_eq!(
            strict.exec(["app", "--n", "x", "v"]).unwrap_err().kind(),
            ErrorKind::Unknown
        );
        assert!(Executor::new(&roots).exec(["app"]).is_ok());
    }

    #[test]
    fn test_settings_deserialize_with_defaults() {
        let settings: ExecSettings = serde_json::from_str(r#"{"strict_arity": true}"#).unwrap();
        assert!(settings.strict_arity);
        assert!(!settings.strict_values);
    }
}
