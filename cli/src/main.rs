use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use cmdtree_core::{
    Command as TreeCommand, Dict, Executor, Handler, HandlerResult, Invocation, TreeFile,
    help_text,
};
use cmdtree_render::Printer;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Output format for `show`.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum ShowFormat {
    Json,
    Yaml,
    Tree,
}

#[derive(Debug, Parser)]
#[command(name = "cmdtree")]
#[command(about = "Validate, inspect and run declarative command trees")]
#[command(disable_help_subcommand = true)]
struct Cli {
    /// Log filter used when RUST_LOG is not set (e.g. debug, cmdtree_core=trace).
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Load and validate one or more tree files.
    Check(CheckArgs),
    /// Print a tree file as JSON, YAML or an indented outline.
    Show(ShowArgs),
    /// Print the generated help for a command path.
    Help(HelpArgs),
    /// Parse an argument vector against a tree and echo what was bound.
    Run(RunArgs),
}

#[derive(Debug, Args)]
struct CheckArgs {
    /// Tree files (.yaml, .yml or .json).
    #[arg(required = true)]
    files: Vec<PathBuf>,
}

#[derive(Debug, Args)]
struct ShowArgs {
    /// Tree file to print.
    file: PathBuf,
    /// Output format.
    #[arg(long, default_value = "tree")]
    format: ShowFormat,
}

#[derive(Debug, Args)]
struct HelpArgs {
    /// Tree file.
    file: PathBuf,
    /// Sub-command names or short names below the root.
    path: Vec<String>,
}

#[derive(Debug, Args)]
struct RunArgs {
    /// Tree file.
    file: PathBuf,
    /// Arguments after the program name, passed through untouched.
    #[arg(last = true, allow_hyphen_values = true)]
    args: Vec<String>,
}

fn main() {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    let result = match cli.command {
        Command::Check(args) => run_check(args),
        Command::Show(args) => run_show(args),
        Command::Help(args) => run_help(args),
        Command::Run(args) => match run_tree(args) {
            Ok(code) => std::process::exit(code),
            Err(err) => Err(err),
        },
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn init_logging(level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load(path: &Path) -> Result<(TreeFile, TreeCommand), String> {
    let tree = TreeFile::load(path)
        .map_err(|err| format!("Failed to load '{}': {err}", path.display()))?;
    let root = tree
        .build()
        .map_err(|err| format!("'{}': {err}", path.display()))?;
    debug!(path = %path.display(), root = %root.name, "Loaded tree file");
    Ok((tree, root))
}

fn run_check(args: CheckArgs) -> Result<(), String> {
    let mut commands = 0;
    for path in &args.files {
        let (_, root) = load(path)?;
        commands += count_commands(&root);
    }
    println!(
        "Checked {} tree file(s) with {} command(s).",
        args.files.len(),
        commands
    );
    Ok(())
}

fn count_commands(command: &TreeCommand) -> usize {
    1 + command.subcommands.iter().map(count_commands).sum::<usize>()
}

fn run_show(args: ShowArgs) -> Result<(), String> {
    let (tree, root) = load(&args.file)?;
    let rendered = match args.format {
        ShowFormat::Json => serde_json::to_string_pretty(&tree)
            .map_err(|err| format!("Failed to serialize tree: {err}"))?,
        ShowFormat::Yaml => serde_yaml::to_string(&tree)
            .map_err(|err| format!("Failed to serialize tree: {err}"))?,
        ShowFormat::Tree => {
            let mut out = String::new();
            outline(&root, 0, &mut out);
            out
        }
    };
    print!("{rendered}");
    if !rendered.ends_with('\n') {
        println!();
    }
    Ok(())
}

fn outline(command: &TreeCommand, depth: usize, out: &mut String) {
    let indent = "  ".repeat(depth);
    let _ = write!(out, "{indent}{}", command.name);
    if let Some(short) = &command.short_name {
        let _ = write!(out, " ({short})");
    }
    if !command.description.is_empty() {
        let _ = write!(out, " - {}", command.description);
    }
    out.push('\n');

    for option in command.user_options() {
        let _ = write!(out, "{indent}  --{}", option.name);
        if let Some(short) = &option.short_name {
            let _ = write!(out, ", -{short}");
        }
        let _ = writeln!(out, " [{}] = {}", option.kind(), option.value);
    }
    for argument in &command.arguments {
        let marker = if argument.optional { "?" } else { "" };
        let _ = writeln!(
            out,
            "{indent}  <{}{marker}> [{}] = {}",
            argument.name,
            argument.kind(),
            argument.value
        );
    }
    for sub in &command.subcommands {
        outline(sub, depth + 1, out);
    }
}

fn run_help(args: HelpArgs) -> Result<(), String> {
    let (_, root) = load(&args.file)?;
    let mut chain = vec![&root];
    for name in &args.path {
        let parent = chain[chain.len() - 1];
        let sub = parent
            .find_subcommand(name)
            .ok_or_else(|| format!("No sub-command '{name}' under '{}'", parent.name))?;
        chain.push(sub);
    }
    let help = help_text(&chain).ok_or_else(|| "No command to describe".to_string())?;
    print!("{help}");
    Ok(())
}

/// Reports the bound values visible to the command being run.
fn echo(inv: &Invocation<'_>) -> HandlerResult {
    let mut dict = Dict::new();
    dict.put("command", &inv.command.name);
    for bound in inv.bindings.options() {
        if !bound.spec.is_help() {
            dict.put(&format!("--{}", bound.spec.name), &bound.value.to_string());
        }
    }
    if inv.is_leaf() {
        for bound in inv.bindings.arguments() {
            dict.put(&format!("<{}>", bound.spec.name), &bound.value.to_string());
        }
    }
    Ok(dict.into())
}

fn attach(command: &mut TreeCommand, handler: &Arc<dyn Handler>) {
    command.set_handler(Arc::clone(handler));
    for sub in &mut command.subcommands {
        attach(sub, handler);
    }
}

fn run_tree(args: RunArgs) -> Result<i32, String> {
    let (tree, mut root) = load(&args.file)?;
    let handler: Arc<dyn Handler> = Arc::new(echo);
    attach(&mut root, &handler);

    let argv: Vec<String> = std::iter::once(root.name.clone())
        .chain(args.args)
        .collect();
    info!(args = ?argv, "Running tree");

    let roots = [root];
    let executor = Executor::new(&roots).with_settings(tree.settings);
    Printer::stdio()
        .run(&executor, argv)
        .map_err(|err| format!("Failed to write output: {err}"))
}
