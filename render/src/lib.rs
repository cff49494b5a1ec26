//! Terminal rendering for cmdtree results.
//!
//! [`render`] turns a handler [`Output`](cmdtree_core::Output) into text:
//! tables get fixed-width columns, dicts an aligned key column, progress
//! blocks ANSI cursor movement for in-place redraw. [`Printer`] drives an
//! [`Executor`](cmdtree_core::Executor) and writes results and errors the way
//! a command-line program reports them.
//!
//! ```no_run
//! use cmdtree_core::{Command, HandlerResult, Invocation, Output};
//!
//! let app = Command::new("hello", None, "Greets")
//!     .with_handler(|_: &Invocation<'_>| -> HandlerResult { Ok(Output::text("hi\n")) });
//! std::process::exit(cmdtree_render::run(&app, std::env::args()));
//! ```

mod dict;
mod printer;
mod progress;
mod table;

use cmdtree_core::{Command, Executor};
use tracing::error;

pub use dict::{KEY_WIDTH, render_dict};
pub use printer::{Printer, render};
pub use progress::{render_progress, render_progress_line};
pub use table::{MAX_COLUMN_WIDTH, MIN_COLUMN_WIDTH, column_widths, render_table};

/// Runs one root command against `args` on stdout/stderr and returns the
/// numeric result code.
pub fn run<I, S>(root: &Command, args: I) -> i32
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let executor = Executor::new(std::slice::from_ref(root));
    match Printer::stdio().run(&executor, args) {
        Ok(code) => code,
        Err(err) => {
            error!(%err, "Failed to write results");
            cmdtree_core::ErrorKind::Unknown.code()
        }
    }
}
