//! Option parsing.
//!
//! Switches are found anywhere in the remaining tokens. A token is a switch
//! when it is longer than one character and starts with `-`; `--name` is
//! looked up by long name and `-n` by short name.

use tracing::debug;

use crate::bindings::{BoundOption, assign};
use crate::error::ExecError;
use crate::exec::ExecSettings;
use crate::spec::OptionSpec;
use crate::tokens::Tokens;
use crate::value::Value;

/// How a switch token names its option.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Switch<'t> {
    Long(&'t str),
    Short(&'t str),
}

impl<'t> Switch<'t> {
    fn classify(token: &'t str) -> Option<Self> {
        if token.len() <= 1 {
            return None;
        }
        let rest = token.strip_prefix('-')?;
        Some(match rest.strip_prefix('-') {
            Some(long) => Switch::Long(long),
            None => Switch::Short(rest),
        })
    }

    fn names(self, spec: &OptionSpec) -> bool {
        match self {
            Switch::Long(name) => spec.matches_long(name),
            Switch::Short(name) => spec.matches_short(name),
        }
    }
}

/// Binds every switch in `tokens` to `options`, gobbling what it consumes.
///
/// Flags are set to `true` and consume only their switch. Every other kind
/// consumes the following token as its value, whatever it looks like.
/// Parsing restarts from the first token after each match and ends when no
/// switch remains. When several options answer to a switch the last one
/// declared wins.
///
/// # Errors
///
/// Stops at the first failure:
/// - [`ExecError::UnknownOption`] for a switch no option answers to
/// - [`ExecError::OptionValueMissing`] for a value option given as the last
///   token
/// - [`ExecError::InvalidValue`] for an unreadable value under
///   `strict_values`
pub fn parse_options(
    options: &mut [BoundOption<'_>],
    tokens: &mut Tokens,
    settings: &ExecSettings,
) -> Result<(), ExecError> {
    loop {
        let Some((at, switch)) = tokens
            .iter()
            .enumerate()
            .find_map(|(at, token)| Switch::classify(token).map(|switch| (at, switch)))
        else {
            return Ok(());
        };

        let token = tokens.get(at).unwrap_or_default().to_string();
        let Some(bound) = options.iter_mut().rev().find(|bound| switch.names(bound.spec)) else {
            return Err(ExecError::UnknownOption(token));
        };

        if bound.spec.is_flag() {
            debug!(option = %bound.spec.name, "Flag set");
            bound.value = Value::Flag(true);
            tokens.gobble(at);
            continue;
        }

        let Some(text) = tokens.get(at + 1) else {
            return Err(ExecError::OptionValueMissing(token));
        };
        debug!(option = %bound.spec.name, value = text, "Option value read");
        assign(
            &mut bound.value,
            &bound.spec.name,
            text,
            settings.strict_values,
        )?;
        tokens.gobble(at);
        tokens.gobble(at);
    }
}
