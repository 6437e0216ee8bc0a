//! End-to-end negotiation tests: scripted invoker, recording sink.

use std::cell::RefCell;

use camino::{Utf8Path, Utf8PathBuf};
use verdict_core::{DiagnosticsSink, Invocation, ToolInvoker, run_check};
use verdict_model::{ReportedDiagnostic, Severity};

/// Replays a fixed list of invocation results and records every call.
struct ScriptedInvoker {
    script: RefCell<Vec<Invocation>>,
    calls: RefCell<Vec<Vec<String>>>,
}

impl ScriptedInvoker {
    fn new(script: Vec<Invocation>) -> Self {
        Self {
            script: RefCell::new(script),
            calls: RefCell::new(Vec::new()),
        }
    }

    fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }

    fn call_args(&self, idx: usize) -> Vec<String> {
        self.calls.borrow()[idx].clone()
    }
}

impl ToolInvoker for ScriptedInvoker {
    fn invoke(&self, _bin: &str, args: &[String], _cwd: &Utf8Path) -> Invocation {
        self.calls.borrow_mut().push(args.to_vec());
        let mut script = self.script.borrow_mut();
        if script.is_empty() {
            Invocation::default()
        } else {
            script.remove(0)
        }
    }
}

#[derive(Default)]
struct RecordingSink {
    cleared: usize,
    sets: Vec<(Utf8PathBuf, Vec<ReportedDiagnostic>)>,
}

impl DiagnosticsSink for RecordingSink {
    fn clear(&mut self) {
        self.cleared += 1;
    }

    fn set(&mut self, file: &Utf8Path, diagnostics: Vec<ReportedDiagnostic>) {
        self.sets.push((file.to_owned(), diagnostics));
    }
}

fn ok_run(stdout: &str, stderr: &str) -> Invocation {
    Invocation {
        stdout: stdout.to_string(),
        stderr: stderr.to_string(),
        exit_code: Some(1),
        startup_error: None,
    }
}

fn startup_failure() -> Invocation {
    Invocation {
        startup_error: Some("No such file or directory".to_string()),
        ..Invocation::default()
    }
}

fn check(invoker: &ScriptedInvoker, user_args: &[&str]) -> RecordingSink {
    let mut sink = RecordingSink::default();
    let args: Vec<String> = user_args.iter().map(ToString::to_string).collect();
    run_check(
        invoker,
        &mut sink,
        "vitc",
        &args,
        Utf8Path::new("/work/project"),
        Utf8Path::new("/work/project/src/main.x"),
    );
    sink
}

#[test]
fn json_output_is_used_directly() {
    let json = r#"{"diagnostics":[
        {"file":"src/main.x","message":"bad","severity":"error",
         "range":{"start":{"line":2,"column":1}}}
    ]}"#;
    let invoker = ScriptedInvoker::new(vec![ok_run(json, "")]);
    let sink = check(&invoker, &["check"]);

    assert_eq!(invoker.call_count(), 1);
    assert_eq!(invoker.call_args(0), vec!["check", "--format=json"]);
    assert_eq!(sink.cleared, 1);
    assert_eq!(sink.sets.len(), 1);
    assert_eq!(sink.sets[0].0, "/work/project/src/main.x");
    assert_eq!(sink.sets[0].1[0].severity, Severity::Error);
    // 1-based (2,1) renders as a 0-based one-character span
    assert_eq!(sink.sets[0].1[0].range.start_line, 1);
    assert_eq!(sink.sets[0].1[0].range.start_column, 0);
    assert_eq!(sink.sets[0].1[0].range.end_column, 1);
}

#[test]
fn valid_empty_json_does_not_trigger_fallback() {
    let invoker = ScriptedInvoker::new(vec![ok_run(r#"{"diagnostics":[]}"#, "")]);
    let sink = check(&invoker, &["check"]);

    // one invocation, no text re-run, active file explicitly cleared
    assert_eq!(invoker.call_count(), 1);
    assert_eq!(sink.cleared, 1);
    assert_eq!(sink.sets.len(), 1);
    assert_eq!(sink.sets[0].0, "/work/project/src/main.x");
    assert!(sink.sets[0].1.is_empty());
}

#[test]
fn non_json_output_reinvokes_with_pristine_args() {
    let invoker = ScriptedInvoker::new(vec![
        ok_run("unsupported option: --format", ""),
        ok_run("src/main.x:10:4: error: unexpected token", ""),
    ]);
    let sink = check(&invoker, &["check"]);

    // exactly two invocations: JSON attempt, then the caller's own args
    assert_eq!(invoker.call_count(), 2);
    assert_eq!(invoker.call_args(0), vec!["check", "--format=json"]);
    assert_eq!(invoker.call_args(1), vec!["check"]);

    assert_eq!(sink.sets.len(), 1);
    let (file, diags) = &sink.sets[0];
    assert!(file.as_str().ends_with("src/main.x"));
    assert_eq!(diags[0].severity, Severity::Error);
    assert_eq!(diags[0].message, "unexpected token");
    assert_eq!(diags[0].range.start_line, 9);
    assert_eq!(diags[0].range.start_column, 3);
}

#[test]
fn undecodable_json_reinvokes_once_at_most() {
    let invoker = ScriptedInvoker::new(vec![
        ok_run("{\"diagnostics\": [truncated", ""),
        ok_run("", ""),
    ]);
    let sink = check(&invoker, &["check"]);

    assert_eq!(invoker.call_count(), 2);
    assert_eq!(sink.cleared, 1);
    assert_eq!(sink.sets.len(), 1);
    assert!(sink.sets[0].1.is_empty());
}

#[test]
fn caller_format_flag_reuses_captured_output() {
    let invoker = ScriptedInvoker::new(vec![ok_run(
        "src/main.x:10: warning: unused variable",
        "",
    )]);
    let sink = check(&invoker, &["check", "--format=text"]);

    // no flag injected, so there is nothing to re-invoke without
    assert_eq!(invoker.call_count(), 1);
    assert_eq!(invoker.call_args(0), vec!["check", "--format=text"]);
    let diags = &sink.sets[0].1;
    assert_eq!(diags[0].severity, Severity::Warning);
    assert_eq!(diags[0].range.start_line, 9);
    assert_eq!(diags[0].range.start_column, 0);
}

#[test]
fn startup_failure_degrades_to_explicit_clear() {
    let invoker = ScriptedInvoker::new(vec![startup_failure()]);
    let sink = check(&invoker, &["check"]);

    // never re-invoked: the binary is not going to appear between calls
    assert_eq!(invoker.call_count(), 1);
    assert_eq!(sink.cleared, 1);
    assert_eq!(sink.sets.len(), 1);
    assert_eq!(sink.sets[0].0, "/work/project/src/main.x");
    assert!(sink.sets[0].1.is_empty());
}

#[test]
fn stderr_participates_in_text_fallback() {
    let invoker = ScriptedInvoker::new(vec![
        ok_run("", ""),
        ok_run("", "lib/parse.x:3:1: error: missing brace"),
    ]);
    let sink = check(&invoker, &["check"]);

    assert_eq!(invoker.call_count(), 2);
    let (file, diags) = &sink.sets[0];
    assert!(file.as_str().ends_with("lib/parse.x"));
    assert_eq!(diags[0].message, "missing brace");
}

#[test]
fn diagnostics_group_across_files_in_first_appearance_order() {
    let text = "\
b.x:1:1: error: one
a.x:2:2: warning: two
b.x:3:3: note: three";
    let invoker = ScriptedInvoker::new(vec![ok_run("", text), ok_run("", text)]);
    let sink = check(&invoker, &["check"]);

    assert_eq!(sink.sets.len(), 2);
    assert!(sink.sets[0].0.as_str().ends_with("b.x"));
    assert_eq!(sink.sets[0].1.len(), 2);
    assert!(sink.sets[1].0.as_str().ends_with("a.x"));
}
