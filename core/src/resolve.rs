//! Command resolution.
//!
//! Walks the remaining tokens against the current candidate commands,
//! descending one level per match. Matched name tokens are gobbled, so
//! options may appear before, between or after command names.

use tracing::debug;

use crate::command::Command;
use crate::spec::get_by_name;
use crate::tokens::Tokens;

/// Resolves the deepest command chain named by `tokens`.
///
/// Each round scans the tokens from the start and takes the first one
/// naming a candidate (initially `roots`, then the last match's
/// sub-commands). The scan restarts after every match and stops once a
/// full pass finds nothing. The returned chain is root first and may be
/// empty.
///
/// # Examples
///
/// ```
/// use cmdtree_core::{Command, Tokens, resolve_chain};
///
/// let roots = vec![Command::new("app", None, "").with_subcommand(Command::new("sub", None, ""))];
/// let mut tokens = Tokens::new(["app", "--flag", "sub"]);
/// let chain = resolve_chain(&roots, &mut tokens);
///
/// let names: Vec<_> = chain.iter().map(|c| c.name.as_str()).collect();
/// assert_eq!(names, ["app", "sub"]);
/// assert_eq!(tokens.as_slice(), ["--flag"]);
/// ```
pub fn resolve_chain<'a>(roots: &'a [Command], tokens: &mut Tokens) -> Vec<&'a Command> {
    let mut chain = Vec::new();
    let mut candidates = roots;

    loop {
        let found = tokens
            .iter()
            .enumerate()
            .find_map(|(at, token)| get_by_name(candidates, token).map(|command| (at, command)));
        let Some((at, command)) = found else {
            break;
        };

        debug!(command = %command.name, position = at, "Matched command token");
        tokens.gobble(at);
        chain.push(command);
        candidates = &command.subcommands;
    }

    chain
}
