//! A main command with one sub-command.
//!
//! Handlers run root first, so `Main Command.` is printed before the
//! sub-command reports what it received.
//!
//! # Usage
//!
//! ```bash
//! cargo run -p cmdtree-demos --example sub_commands -- sub -o
//! cargo run -p cmdtree-demos --example sub_commands -- subcommand --help
//! ```

use cmdtree_core::{Command, HandlerResult, Invocation, OptionSpec, Output, Table};

fn main_command(_: &Invocation<'_>) -> HandlerResult {
    Ok(Output::text("Main Command.\n"))
}

fn sub_command(inv: &Invocation<'_>) -> HandlerResult {
    let mut table = Table::with_headers(["kind", "name", "value"]);
    for bound in inv.bindings.options() {
        table.push_row([
            "option".to_string(),
            bound.spec.name.clone(),
            bound.value.to_string(),
        ]);
    }
    for bound in inv.bindings.arguments() {
        table.push_row([
            "argument".to_string(),
            bound.spec.name.clone(),
            bound.value.to_string(),
        ]);
    }
    Ok(table.into())
}

fn main() {
    let program = std::env::args().next().unwrap_or_else(|| "sub_commands".to_string());
    let main_cmd = Command::new(&program, Some("cmd"), "Main Command")
        .with_handler(main_command)
        .with_subcommand(
            Command::new("subcommand", Some("sub"), "Sub Command")
                .with_option(OptionSpec::flag("option-one", Some("o"), false, false, "Option One"))
                .with_handler(sub_command),
        );

    std::process::exit(cmdtree_render::run(&main_cmd, std::env::args()));
}
