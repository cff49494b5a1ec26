use std::io::{self, Stderr, Stdout, Write};

use cmdtree_core::{Dispatch, ErrorKind, Executor, Outcome, Output};
use tracing::debug;

use crate::dict::render_dict;
use crate::progress::render_progress;
use crate::table::render_table;

/// Renders any handler output to text.
pub fn render(output: &Output) -> String {
    match output {
        Output::Text(text) => text.clone(),
        Output::Table(table) => render_table(table),
        Output::Dict(dict) => render_dict(dict),
        Output::Progress(block) => render_progress(block),
    }
}

/// Writes execution results to an output and an error stream.
///
/// Handler outputs and help go to `out`; parse failures and handler errors
/// go to `err`.
#[derive(Debug)]
pub struct Printer<W, E> {
    out: W,
    err: E,
}

impl Printer<Stdout, Stderr> {
    /// A printer on the process's stdout and stderr.
    pub fn stdio() -> Self {
        Self::new(io::stdout(), io::stderr())
    }
}

impl<W: Write, E: Write> Printer<W, E> {
    pub fn new(out: W, err: E) -> Self {
        Self { out, err }
    }

    /// Gives the streams back.
    pub fn into_inner(self) -> (W, E) {
        (self.out, self.err)
    }

    /// Writes one rendered output.
    pub fn print_output(&mut self, output: &Output) -> io::Result<()> {
        self.out.write_all(render(output).as_bytes())?;
        self.out.flush()
    }

    fn print_dispatched(&mut self, dispatched: &[Dispatch]) -> io::Result<()> {
        for dispatch in dispatched {
            match &dispatch.result {
                Ok(output) => self.print_output(output)?,
                Err(err) => {
                    debug!(command = %dispatch.command, kind = %err.kind, "Handler failed");
                    writeln!(self.err, "Error: {err}")?;
                }
            }
        }
        Ok(())
    }

    /// Prints a finished invocation.
    pub fn print_outcome(&mut self, outcome: &Outcome) -> io::Result<()> {
        match outcome {
            Outcome::Help(text) => {
                self.out.write_all(text.as_bytes())?;
                self.out.flush()
            }
            Outcome::Completed(dispatched) => self.print_dispatched(dispatched),
        }
    }

    /// Executes `args` and prints everything that came out of it.
    ///
    /// A parse failure is reported as `Error: <message>` and a blank line,
    /// followed by the help of the deepest resolved command unless the
    /// command itself was not found. Outputs of parent handlers that ran
    /// before the failure are printed first.
    ///
    /// Returns the numeric result code.
    ///
    /// # Errors
    ///
    /// Returns an error only if writing to one of the streams fails.
    ///
    /// # Examples
    ///
    /// ```
    /// use cmdtree_core::{Command, Executor};
    /// use cmdtree_render::Printer;
    ///
    /// let roots = [Command::new("app", None, "Demo")];
    /// let mut printer = Printer::new(Vec::new(), Vec::new());
    /// let code = printer.run(&Executor::new(&roots), ["app", "extra"]).unwrap();
    /// assert_eq!(code, 6);
    ///
    /// let (_, err) = printer.into_inner();
    /// let err = String::from_utf8(err).unwrap();
    /// assert!(err.starts_with("Error: 1 extra arguments found.\n\nUsage: app"));
    /// ```
    pub fn run<I, S>(&mut self, executor: &Executor<'_>, args: I) -> io::Result<i32>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        match executor.exec(args) {
            Ok(outcome) => {
                self.print_outcome(&outcome)?;
                Ok(outcome.code())
            }
            Err(failure) => {
                self.print_dispatched(&failure.dispatched)?;
                write!(self.err, "Error: {}\n\n", failure.error)?;
                if failure.kind() != ErrorKind::CommandNotFound {
                    if let Some(help) = &failure.help {
                        self.err.write_all(help.as_bytes())?;
                    }
                }
                self.err.flush()?;
                Ok(failure.code())
            }
        }
    }
}
