use std::sync::{Arc, Mutex};

use cmdtree_core::*;

// ---------------------------------------------------------------------------
// helpers
// ---------------------------------------------------------------------------

/// Records the bound values every handler saw, one line per handler call.
#[derive(Clone, Default)]
struct Recorder {
    lines: Arc<Mutex<Vec<String>>>,
}

impl Recorder {
    fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.lines.lock().unwrap())
    }
}

fn recording(lines: Arc<Mutex<Vec<String>>>) -> impl Handler {
    move |inv: &Invocation<'_>| -> HandlerResult {
        let b = inv.bindings;
        let mut line = inv.command.name.clone();
        for bound in b.options() {
            line.push_str(&format!(" {}={}", bound.spec.name, bound.value));
        }
        for bound in b.arguments() {
            line.push_str(&format!(" <{}>={}", bound.spec.name, bound.value));
        }
        lines.lock().unwrap().push(line);
        Ok(Output::text(inv.command.name.clone()))
    }
}

fn tree(recorder: &Recorder) -> Command {
    Command::new("./target/app", Some("app"), "Main Command")
        .with_option(OptionSpec::string("opt", Some("o"), None, None, "An option"))
        .with_handler(recording(Arc::clone(&recorder.lines)))
        .with_subcommand(
            Command::new("sub", Some("s"), "Sub Command")
                .with_option(OptionSpec::flag("flag", Some("f"), false, false, "A flag"))
                .with_option(OptionSpec::string("name", Some("n"), None, None, "A name"))
                .with_argument(ArgumentSpec::string("first", None, None, "First"))
                .with_argument(ArgumentSpec::integer("second", 0, 0, "Second"))
                .with_handler(recording(Arc::clone(&recorder.lines))),
        )
}

fn run(root: &Command, args: &[&str]) -> Result<Outcome, ExecFailure> {
    let mut argv = vec!["./target/app"];
    argv.extend_from_slice(args);
    root.exec(argv)
}

// ---------------------------------------------------------------------------
// resolution
// ---------------------------------------------------------------------------

#[test]
fn resolution_is_greedy_and_gobbles_command_tokens() {
    let root = tree(&Recorder::default());
    let roots = [root];
    let mut tokens = Tokens::new(["./target/app", "sub", "--flag"]);
    let chain = resolve_chain(&roots, &mut tokens);
    let names: Vec<_> = chain.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, ["./target/app", "sub"]);
    assert_eq!(tokens.as_slice(), ["--flag"]);
}

#[test]
fn options_may_come_before_or_after_subcommands() {
    let recorder = Recorder::default();
    let root = tree(&recorder);

    run(&root, &["--opt", "v", "sub", "a", "1"]).unwrap();
    let before = recorder.take();
    run(&root, &["sub", "--opt", "v", "a", "1"]).unwrap();
    let after = recorder.take();

    assert_eq!(before, after);
    assert_eq!(before.len(), 2);
    assert!(before[1].contains(" opt=v"));
}

// ---------------------------------------------------------------------------
// options
// ---------------------------------------------------------------------------

#[test]
fn flag_and_value_options() {
    let recorder = Recorder::default();
    let root = tree(&recorder);
    run(&root, &["sub", "--flag", "-n", "x", "a", "2"]).unwrap();
    let lines = recorder.take();
    assert!(lines[1].contains(" flag=true"));
    assert!(lines[1].contains(" name=x"));
    assert!(lines[1].contains(" <first>=a <second>=2"));
}

#[test]
fn unknown_option_fails_before_any_handler() {
    let recorder = Recorder::default();
    let root = tree(&recorder);
    let failure = run(&root, &["sub", "--bogus", "--flag"]).unwrap_err();
    assert_eq!(failure.error, ExecError::UnknownOption("--bogus".into()));
    assert_eq!(failure.kind(), ErrorKind::OptionNotFound);
    assert_eq!(failure.code(), 4);
    assert!(failure.dispatched.is_empty());
    assert!(recorder.take().is_empty());
}

#[test]
fn missing_option_value() {
    let root = tree(&Recorder::default());
    let failure = run(&root, &["sub", "a", "1", "--name"]).unwrap_err();
    assert_eq!(failure.error, ExecError::OptionValueMissing("--name".into()));
    assert_eq!(failure.kind(), ErrorKind::OptionNotFound);
}

#[test]
fn child_options_are_unknown_to_the_parent_alone() {
    let root = tree(&Recorder::default());
    let failure = run(&root, &["--flag"]).unwrap_err();
    assert_eq!(failure.error, ExecError::UnknownOption("--flag".into()));
    assert!(failure.help.unwrap().starts_with("Usage: app [OPTIONS] COMMAND"));
}

// ---------------------------------------------------------------------------
// arguments
// ---------------------------------------------------------------------------

#[test]
fn exact_arguments_succeed_and_overflow_is_reported() {
    let recorder = Recorder::default();
    let root = tree(&recorder);

    let outcome = run(&root, &["sub", "a", "7"]).unwrap();
    assert_eq!(outcome.kind(), ErrorKind::Success);

    let failure = run(&root, &["sub", "a", "7", "extra"]).unwrap_err();
    assert_eq!(failure.error, ExecError::ExtraArgumentsFound(1));
    assert_eq!(failure.code(), 6);
    // The root handler already ran when the leaf failed to bind.
    assert_eq!(failure.dispatched.len(), 1);
    assert_eq!(failure.dispatched[0].command, "./target/app");
}

#[test]
fn shortfall_policy_follows_settings() {
    let recorder = Recorder::default();
    let roots = [tree(&recorder)];

    let lenient = Executor::new(&roots);
    assert!(lenient.exec(["app", "sub", "only"]).is_ok());
    let lines = recorder.take();
    assert!(lines[1].ends_with("<first>=only <second>=0"));

    let strict = lenient.with_settings(ExecSettings {
        strict_arity: true,
        ..ExecSettings::default()
    });
    let failure = strict.exec(["app", "sub", "only"]).unwrap_err();
    assert_eq!(failure.error, ExecError::ArgumentMissing("second".into()));
    assert_eq!(failure.kind(), ErrorKind::ArgumentNotFound);
}

// ---------------------------------------------------------------------------
// help
// ---------------------------------------------------------------------------

#[test]
fn help_short_circuits_binding_and_handlers() {
    let recorder = Recorder::default();
    let root = tree(&recorder);

    for flag in ["--help", "-h"] {
        let outcome = run(&root, &["sub", "too", "many", "tokens", flag]).unwrap();
        let Outcome::Help(text) = &outcome else {
            panic!("expected help, got {outcome:?}");
        };
        assert!(text.starts_with("Usage: app sub [OPTIONS] <first> <second>\nOR:    app s"));
        assert!(text.contains("\t-f, --flag"));
        assert_eq!(outcome.code(), 0);
    }
    assert!(recorder.take().is_empty());
}

#[test]
fn unresolved_command_has_no_help() {
    let root = tree(&Recorder::default());
    let failure = root.exec(["somewhere-else", "--help"]).unwrap_err();
    assert_eq!(failure.error, ExecError::CommandNotFound);
    assert_eq!(failure.code(), 3);
    assert!(failure.help.is_none());
}

// ---------------------------------------------------------------------------
// declaration and reuse
// ---------------------------------------------------------------------------

#[test]
fn building_the_same_tree_twice_is_deterministic() {
    let a = tree(&Recorder::default());
    let b = tree(&Recorder::default());
    assert_eq!(CommandDecl::from_command(&a), CommandDecl::from_command(&b));
    assert_eq!(a.options, b.options);
    assert_eq!(a.subcommands[0].arguments, b.subcommands[0].arguments);
}

#[test]
fn repeated_execution_does_not_leak_values() {
    let recorder = Recorder::default();
    let roots = [tree(&recorder)];
    let executor = Executor::new(&roots);

    executor
        .exec(["app", "sub", "--flag", "--name", "first-run", "a", "5"])
        .unwrap();
    executor.exec(["app", "sub", "b"]).unwrap();

    let lines = recorder.take();
    assert!(lines[3].contains(" flag=false"));
    assert!(lines[3].contains(" name="));
    assert!(!lines[3].contains("first-run"));
    assert!(lines[3].ends_with("<first>=b <second>=0"));

    // The declared tree was never written.
    let sub = &roots[0].subcommands[0];
    assert_eq!(sub.get_option("flag").unwrap().value, Value::Flag(false));
    assert_eq!(sub.get_argument("first").unwrap().value, Value::String(None));
}

#[test]
fn tree_file_drives_execution() {
    let yaml = r#"
settings:
  strict_arity: true
command:
  name: tool
  commands:
    - name: greet
      arguments:
        - name: who
          kind: string
"#;
    let tree = TreeFile::from_yaml_str(yaml).unwrap();
    let mut root = tree.build().unwrap();
    root.subcommands[0].set_handler(Arc::new(|inv: &Invocation<'_>| -> HandlerResult {
        Ok(Output::text(format!("hi {}", inv.bindings.argument("who").as_str())))
    }));
    let roots = [root];
    let executor = Executor::new(&roots).with_settings(tree.settings);

    let outcome = executor.exec(["tool", "greet", "ada"]).unwrap();
    assert_eq!(outcome.outputs().next(), Some(&Output::text("hi ada")));
    assert_eq!(
        executor.exec(["tool", "greet"]).unwrap_err().kind(),
        ErrorKind::ArgumentNotFound
    );
}
