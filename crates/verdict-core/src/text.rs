//! Tolerant line-oriented parsing of free-text checker output.
//!
//! Real tool output interleaves diagnostic lines with code frames, carets,
//! and blank lines. The grammar here is strictly line-local: an ordered list
//! of matchers is tried per line, first match wins, and anything that
//! matches nothing is dropped as noise. No multi-line reconstruction.

use std::sync::LazyLock;

use camino::Utf8Path;
use regex::Regex;
use verdict_model::{Diagnostic, Position, Range, Severity};

use crate::paths;

// `path:line:col: severity: message` - gcc/clang style, colon after the
// severity tolerated either way.
static RE_PATH_LINE_COL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(.+?):(\d+):(\d+):\s*(error|warning|note|info)\s*:?\s*(.+)$")
        .expect("path:line:col pattern")
});

// `path:line: severity: message` - same, without a column.
static RE_PATH_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(.+?):(\d+):\s*(error|warning|note|info)\s*:?\s*(.+)$")
        .expect("path:line pattern")
});

// `at path:line:col` anywhere in the line - stack-frame style context.
static RE_AT_LOCATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)at\s+(.+?):(\d+):(\d+)").expect("at-location pattern"));

/// Extract diagnostics from concatenated stdout+stderr text.
#[must_use]
pub fn parse_diagnostics(output: &str, cwd: &Utf8Path) -> Vec<Diagnostic> {
    let mut out = Vec::new();
    for line in output.lines() {
        if let Some(diag) = match_path_line_col(line, cwd)
            .or_else(|| match_path_line(line, cwd))
            .or_else(|| match_at_location(line, cwd))
        {
            out.push(diag);
        }
    }
    out
}

fn match_path_line_col(line: &str, cwd: &Utf8Path) -> Option<Diagnostic> {
    let caps = RE_PATH_LINE_COL.captures(line)?;
    Some(Diagnostic {
        file: paths::resolve(cwd, &caps[1]),
        message: caps[5].trim().to_string(),
        severity: Severity::normalize(Some(&caps[4])),
        code: None,
        range: Some(point_range(int_capture(&caps[2]), int_capture(&caps[3]))),
    })
}

fn match_path_line(line: &str, cwd: &Utf8Path) -> Option<Diagnostic> {
    let caps = RE_PATH_LINE.captures(line)?;
    Some(Diagnostic {
        file: paths::resolve(cwd, &caps[1]),
        message: caps[4].trim().to_string(),
        severity: Severity::normalize(Some(&caps[3])),
        code: None,
        range: Some(point_range(int_capture(&caps[2]), 1)),
    })
}

/// Lowest priority: a stack-trace-like `at path:line:col` fragment. The
/// diagnostic carries the rest of the line as its message, severity `note`.
fn match_at_location(line: &str, cwd: &Utf8Path) -> Option<Diagnostic> {
    let caps = RE_AT_LOCATION.captures(line)?;
    let message = RE_AT_LOCATION.replace(line, "").trim().to_string();
    Some(Diagnostic {
        file: paths::resolve(cwd, &caps[1]),
        message,
        severity: Severity::Note,
        code: None,
        range: Some(point_range(int_capture(&caps[2]), int_capture(&caps[3]))),
    })
}

const fn point_range(line: u32, column: u32) -> Range {
    Range {
        start: Position { line, column },
        end: None,
    }
}

// Captures are `\d+` so this only falls back on overflow-sized garbage.
fn int_capture(text: &str) -> u32 {
    text.parse().unwrap_or(1)
}
