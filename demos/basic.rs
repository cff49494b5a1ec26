//! Basic usage: one command with one flag option and one argument.
//!
//! # Usage
//!
//! ```bash
//! cargo run -p cmdtree-demos --example basic -- -o some-value
//! cargo run -p cmdtree-demos --example basic -- --help
//! ```

use cmdtree_core::{ArgumentSpec, Command, Dict, HandlerResult, Invocation, OptionSpec};

fn basic(inv: &Invocation<'_>) -> HandlerResult {
    let mut dict = Dict::new();
    for bound in inv.bindings.options() {
        dict.put(&format!("option {}", bound.spec.name), &bound.value.to_string());
    }
    for bound in inv.bindings.arguments() {
        dict.put(&format!("argument {}", bound.spec.name), &bound.value.to_string());
    }
    Ok(dict.into())
}

fn main() {
    println!("Basic usage with one argument and one option.");

    let program = std::env::args().next().unwrap_or_else(|| "basic".to_string());
    let cmd = Command::new(&program, Some("cmd"), "Basic Description")
        .with_option(OptionSpec::flag("option-one", Some("o"), false, false, "Option One"))
        .with_argument(ArgumentSpec::string("arg-one", Some("blah"), Some("blah"), "Argument One"))
        .with_handler(basic);

    std::process::exit(cmdtree_render::run(&cmd, std::env::args()));
}
