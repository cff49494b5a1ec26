//! Command tree nodes and the handler interface.

use std::fmt;
use std::sync::Arc;

use crate::bindings::Bindings;
use crate::error::{ExecFailure, HandlerError};
use crate::exec::{Executor, Outcome};
use crate::output::Output;
use crate::spec::{ArgumentSpec, Named, OptionSpec, get_by_name};

/// What a handler returns: an output payload or a failure.
pub type HandlerResult = Result<Output, HandlerError>;

/// Per-command behaviour, run once for every command in a resolved chain.
///
/// Closures taking an [`Invocation`] implement this trait.
///
/// # Examples
///
/// ```
/// use cmdtree_core::{Command, HandlerResult, Invocation, Output};
///
/// let cmd = Command::new("greet", None, "Say hello").with_handler(
///     |inv: &Invocation<'_>| -> HandlerResult {
///         Ok(Output::text(format!("hello from {}", inv.command.name)))
///     },
/// );
/// assert!(cmd.has_handler());
/// ```
pub trait Handler: Send + Sync {
    /// Runs the command with the bound values of this invocation.
    fn handle(&self, invocation: &Invocation<'_>) -> HandlerResult;
}

impl<F> Handler for F
where
    F: Fn(&Invocation<'_>) -> HandlerResult + Send + Sync,
{
    fn handle(&self, invocation: &Invocation<'_>) -> HandlerResult {
        self(invocation)
    }
}

/// Context handed to a [`Handler`].
#[derive(Debug, Clone, Copy)]
pub struct Invocation<'a> {
    /// The command whose handler is running.
    pub command: &'a Command,
    /// Resolved chain, root first.
    pub chain: &'a [&'a Command],
    /// Merged option and argument values for the whole chain.
    pub bindings: &'a Bindings<'a>,
}

impl Invocation<'_> {
    /// Returns `true` if the running command is the last of the chain.
    pub fn is_leaf(&self) -> bool {
        self.chain
            .last()
            .is_some_and(|leaf| std::ptr::eq(*leaf, self.command))
    }
}

/// A node of the command tree.
///
/// Every command starts with the built-in `--help` / `-h` flag. Options,
/// arguments and sub-commands keep their insertion order, which decides
/// positional binding and help layout.
///
/// # Examples
///
/// ```
/// use cmdtree_core::{ArgumentSpec, Command, OptionSpec};
///
/// let app = Command::new("app", Some("a"), "Demo application")
///     .with_option(OptionSpec::flag("verbose", Some("v"), false, false, "Talk more"))
///     .with_subcommand(
///         Command::new("copy", Some("cp"), "Copy a file")
///             .with_argument(ArgumentSpec::string("src", None, None, "Source"))
///             .with_argument(ArgumentSpec::string("dst", None, None, "Destination")),
///     );
///
/// assert_eq!(app.options.len(), 2); // help + verbose
/// assert!(app.find_subcommand("cp").is_some());
/// assert!(app.get_option("v").is_some());
/// ```
#[derive(Clone)]
pub struct Command {
    /// Name matched against tokens.
    pub name: String,
    /// Alternative token for the command.
    pub short_name: Option<String>,
    /// Help text.
    pub description: String,
    /// Declared options, help first.
    pub options: Vec<OptionSpec>,
    /// Declared positional arguments.
    pub arguments: Vec<ArgumentSpec>,
    /// Child commands.
    pub subcommands: Vec<Command>,
    handler: Option<Arc<dyn Handler>>,
}

impl Command {
    /// Creates a command without handler, carrying only the help option.
    pub fn new(name: &str, short_name: Option<&str>, description: &str) -> Self {
        Self {
            name: name.to_string(),
            short_name: short_name.map(String::from),
            description: description.to_string(),
            options: vec![OptionSpec::help()],
            arguments: Vec::new(),
            subcommands: Vec::new(),
            handler: None,
        }
    }

    /// Sets the handler.
    pub fn with_handler(mut self, handler: impl Handler + 'static) -> Self {
        self.handler = Some(Arc::new(handler));
        self
    }

    /// Replaces the handler with a shared one.
    pub fn set_handler(&mut self, handler: Arc<dyn Handler>) -> &mut Self {
        self.handler = Some(handler);
        self
    }

    /// Returns the handler, if any.
    pub fn handler(&self) -> Option<&dyn Handler> {
        self.handler.as_deref()
    }

    /// Returns `true` if a handler is set.
    pub fn has_handler(&self) -> bool {
        self.handler.is_some()
    }

    /// Appends an option.
    pub fn with_option(mut self, option: OptionSpec) -> Self {
        self.options.push(option);
        self
    }

    /// Appends a positional argument.
    pub fn with_argument(mut self, argument: ArgumentSpec) -> Self {
        self.arguments.push(argument);
        self
    }

    /// Appends a child command.
    pub fn with_subcommand(mut self, subcommand: Command) -> Self {
        self.subcommands.push(subcommand);
        self
    }

    /// Appends an option in place.
    pub fn add_option(&mut self, option: OptionSpec) -> &mut Self {
        self.options.push(option);
        self
    }

    /// Appends a positional argument in place.
    pub fn add_argument(&mut self, argument: ArgumentSpec) -> &mut Self {
        self.arguments.push(argument);
        self
    }

    /// Appends a child command in place.
    pub fn add_subcommand(&mut self, subcommand: Command) -> &mut Self {
        self.subcommands.push(subcommand);
        self
    }

    /// Returns `true` if `token` is the command's name or short name.
    pub fn matches(&self, token: &str) -> bool {
        self.name == token || self.short_name.as_deref() == Some(token)
    }

    /// Finds a direct child by name or short name.
    pub fn find_subcommand(&self, token: &str) -> Option<&Command> {
        get_by_name(&self.subcommands, token)
    }

    /// Finds a declared option by long or short name.
    pub fn get_option(&self, name: &str) -> Option<&OptionSpec> {
        get_by_name(&self.options, name)
    }

    /// Finds a declared argument by name.
    pub fn get_argument(&self, name: &str) -> Option<&ArgumentSpec> {
        get_by_name(&self.arguments, name)
    }

    /// Options other than the built-in help flag.
    pub fn user_options(&self) -> impl Iterator<Item = &OptionSpec> {
        self.options.iter().filter(|option| !option.is_help())
    }

    /// Runs the tree rooted at this command against `args`.
    ///
    /// `args` usually includes the program path first, matching a root
    /// command named after it.
    ///
    /// # Errors
    ///
    /// Returns an [`ExecFailure`] when resolution, option parsing or
    /// argument binding fails.
    pub fn exec<I, S>(&self, args: I) -> Result<Outcome, ExecFailure>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Executor::new(std::slice::from_ref(self)).exec(args)
    }
}

impl Named for Command {
    fn is_named(&self, name: &str) -> bool {
        self.matches(name)
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("short_name", &self.short_name)
            .field("description", &self.description)
            .field("options", &self.options)
            .field("arguments", &self.arguments)
            .field("subcommands", &self.subcommands)
            .field("handler", &self.handler.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_command_carries_help_option() {
        let cmd = Command::new("app", None, "App");
        assert_eq!(cmd.options, vec![OptionSpec::help()]);
        assert!(cmd.get_option("help").is_some());
        assert!(cmd.get_option("h").is_some());
        assert_eq!(cmd.user_options().count(), 0);
    }

    #[test]
    fn test_insertion_order_is_kept() {
        let mut cmd = Command::new("app", None, "App");
        cmd.add_argument(ArgumentSpec::string("first", None, None, ""))
            .add_argument(ArgumentSpec::string("second", None, None, ""))
            .add_option(OptionSpec::flag("x", None, false, false, ""));
        let names: Vec<_> = cmd.arguments.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["first", "second"]);
        assert_eq!(cmd.options.last().unwrap().name, "x");
    }

    #[test]
    fn test_matches_name_and_short_name() {
        let cmd = Command::new("subcommand", Some("sub"), "");
        assert!(cmd.matches("subcommand"));
        assert!(cmd.matches("sub"));
        assert!(!cmd.matches("s"));
    }

    #[test]
    fn test_clone_shares_handler() {
        let cmd = Command::new("app", None, "")
            .with_handler(|_: &Invocation<'_>| -> HandlerResult { Ok(Output::text("ok")) });
        let copy = cmd.clone();
        assert!(copy.has_handler());
        assert!(format!("{copy:?}").contains("handler: true"));
    }
}
