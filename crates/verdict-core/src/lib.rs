#![warn(rust_2024_compatibility, clippy::all)]

//! The Verdict pipeline: invoke an external checker, negotiate its output
//! format, and hand a normalized, grouped diagnostic set to a sink.
//!
//! The pipeline is deliberately infallible: every failure mode - a missing
//! binary, malformed JSON, noise lines, a bad path on one record - degrades
//! to fewer or zero diagnostics instead of an error the host has to handle.

pub mod config;
pub mod group;
pub mod json;
pub mod paths;
pub mod text;

use camino::Utf8Path;
use verdict_model::{Diagnostic, ReportedDiagnostic};

pub use config::{CheckerSettings, ConfigError, VerdictConfig};

/// Captured result of one checker invocation.
///
/// A failure to even start the process (binary missing, not executable) is
/// data here, not an error: the pipeline treats it as "no usable structured
/// output" and moves on.
#[derive(Debug, Clone, Default)]
pub struct Invocation {
    pub stdout: String,
    pub stderr: String,
    /// Absent when the process was killed (e.g. by the invoker's timeout).
    pub exit_code: Option<i32>,
    pub startup_error: Option<String>,
}

impl Invocation {
    #[must_use]
    pub const fn started(&self) -> bool {
        self.startup_error.is_none()
    }
}

/// Capability to run the external checker and capture its output.
///
/// Implementations own process plumbing and timeout/kill policy; the
/// pipeline only consumes the captured result.
pub trait ToolInvoker {
    fn invoke(&self, bin: &str, args: &[String], cwd: &Utf8Path) -> Invocation;
}

/// Capability to receive grouped diagnostics, replace-on-update per file.
pub trait DiagnosticsSink {
    /// Drop all previously reported diagnostics.
    fn clear(&mut self);
    /// Replace the diagnostics for exactly this file.
    fn set(&mut self, file: &Utf8Path, diagnostics: Vec<ReportedDiagnostic>);
}

/// Run one check: invoke the tool, parse its output (JSON preferred, text
/// fallback), group by file, and report to the sink.
///
/// `active_file` is the file that triggered the check; it gets an explicit
/// empty `set` when the run produced no diagnostics at all, so a fixed
/// issue visibly disappears from the sink.
///
/// At most two subprocess invocations happen per call, never concurrently:
/// the JSON-seeking attempt, and one fallback re-invocation when (and only
/// when) the format flag was injected and the first run actually started.
pub fn run_check(
    invoker: &dyn ToolInvoker,
    sink: &mut dyn DiagnosticsSink,
    bin: &str,
    user_args: &[String],
    cwd: &Utf8Path,
    active_file: &Utf8Path,
) {
    let (json_args, injected_format) = args_with_json_format(user_args);
    let first = invoker.invoke(bin, &json_args, cwd);

    if let Some(err) = &first.startup_error {
        tracing::warn!("checker '{bin}' failed to start: {err}");
    }

    let structured = if first.started() && looks_like_json(&first.stdout) {
        json::parse_diagnostics(&first.stdout, cwd)
    } else {
        None
    };

    let diagnostics = match structured {
        Some(list) => list,
        None => {
            // The injected flag may have changed the output shape; rerun
            // with the caller's pristine arguments before text parsing.
            let (stdout, stderr) = if injected_format && first.started() {
                tracing::debug!("checker output not JSON, re-invoking without format flag");
                let second = invoker.invoke(bin, user_args, cwd);
                (second.stdout, second.stderr)
            } else {
                (first.stdout, first.stderr)
            };
            text::parse_diagnostics(&combine_streams(&stdout, &stderr), cwd)
        }
    };

    let grouped = group::by_file(diagnostics);
    group::report(sink, grouped, active_file);
}

/// Append `--format=json` unless the caller already controls the output
/// format. The caller's list is never mutated: it is reused verbatim when
/// the fallback path re-invokes.
#[must_use]
pub fn args_with_json_format(args: &[String]) -> (Vec<String>, bool) {
    let has_format = args
        .iter()
        .any(|a| a == "--format" || a.starts_with("--format="));
    if has_format {
        return (args.to_vec(), false);
    }
    let mut with_json = Vec::with_capacity(args.len() + 1);
    with_json.extend_from_slice(args);
    with_json.push("--format=json".to_string());
    (with_json, true)
}

/// Cheap pre-check before attempting a structured parse.
#[must_use]
pub fn looks_like_json(text: &str) -> bool {
    let trimmed = text.trim_start();
    trimmed.starts_with('{') || trimmed.starts_with('[')
}

fn combine_streams(stdout: &str, stderr: &str) -> String {
    match (stdout.is_empty(), stderr.is_empty()) {
        (false, false) => format!("{stdout}\n{stderr}"),
        (false, true) => stdout.to_string(),
        (true, _) => stderr.to_string(),
    }
}
