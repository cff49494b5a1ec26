//! Positional argument binding for the leaf command.

use tracing::debug;

use crate::bindings::{BoundArgument, assign};
use crate::error::ExecError;
use crate::exec::ExecSettings;
use crate::tokens::Tokens;

/// Binds the leading tokens to `arguments` in declaration order.
///
/// With at least as many tokens as arguments every argument is bound and
/// that many tokens are gobbled from the front; the excess stays for the
/// caller to report. With fewer tokens only the first `tokens.len()`
/// arguments are bound, unless `strict_arity` asks for every required
/// argument.
///
/// A flag argument consumes its token without changing its value.
///
/// # Errors
///
/// - [`ExecError::ArgumentMissing`] under `strict_arity` for the first
///   required argument left without a token
/// - [`ExecError::InvalidValue`] under `strict_values` for an unreadable
///   token
pub fn parse_arguments(
    arguments: &mut [BoundArgument<'_>],
    tokens: &mut Tokens,
    settings: &ExecSettings,
) -> Result<(), ExecError> {
    let declared = arguments.len();
    let given = tokens.len();
    let bound_count = declared.min(given);
    debug!(declared, given, "Binding arguments");

    if settings.strict_arity {
        if let Some(missing) = arguments[bound_count..]
            .iter()
            .find(|bound| !bound.spec.optional)
        {
            return Err(ExecError::ArgumentMissing(missing.spec.name.clone()));
        }
    }

    for (bound, text) in arguments.iter_mut().zip(tokens.iter()) {
        assign(
            &mut bound.value,
            &bound.spec.name,
            text,
            settings.strict_values,
        )?;
    }

    for _ in 0..bound_count {
        tokens.gobble(0);
    }
    Ok(())
}
