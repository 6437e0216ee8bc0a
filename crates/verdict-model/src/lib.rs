#![warn(rust_2024_compatibility, clippy::all)]

//! Diagnostic model shared between the Verdict pipeline and its hosts.
//!
//! Checker tools report positions 1-based; sinks render 0-based. The types
//! here keep the two conventions apart: [`Position`]/[`Range`] are the raw
//! 1-based shapes as parsed, [`RenderRange`] is the 0-based, always
//! well-formed shape handed to a sink. The conversion happens exactly once,
//! in [`Diagnostic::into_reported`].

use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};

/// The closed four-level severity classification.
///
/// Anything a tool reports outside this vocabulary is downgraded to `Info`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Note,
    Info,
}

impl Severity {
    /// Map an arbitrary severity token to one of the four levels.
    ///
    /// Case-insensitive exact match wins; absent or unrecognized tokens
    /// normalize to `Info`. Total - this never fails.
    #[must_use]
    pub fn normalize(token: Option<&str>) -> Self {
        match token.map(str::to_ascii_lowercase).as_deref() {
            Some("error") => Self::Error,
            Some("warning") => Self::Warning,
            Some("note") => Self::Note,
            _ => Self::Info,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Note => "note",
            Self::Info => "info",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A 1-based source position as reported by the checker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

/// A 1-based source range; the end is optional when the tool only reports
/// where a problem starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Range {
    pub start: Position,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<Position>,
}

/// A 0-based, always well-formed range ready for rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderRange {
    pub start_line: u32,
    pub start_column: u32,
    pub end_line: u32,
    pub end_column: u32,
}

impl RenderRange {
    /// Convert an optional 1-based tool range into a concrete 0-based range.
    ///
    /// - no range at all: one character at the start of the file;
    /// - start and a usable end (both fields non-zero): both endpoints
    ///   converted, flooring at 0;
    /// - start only: a one-character span at the start point.
    #[must_use]
    pub fn from_tool(range: Option<&Range>) -> Self {
        let Some(r) = range else {
            return Self {
                start_line: 0,
                start_column: 0,
                end_line: 0,
                end_column: 1,
            };
        };

        let start_line = r.start.line.saturating_sub(1);
        let start_column = r.start.column.saturating_sub(1);

        if let Some(end) = r.end
            && end.line > 0
            && end.column > 0
        {
            return Self {
                start_line,
                start_column,
                end_line: end.line - 1,
                end_column: end.column - 1,
            };
        }

        Self {
            start_line,
            start_column,
            end_line: start_line,
            end_column: start_column + 1,
        }
    }
}

/// One normalized issue from a checker run, keyed by canonical file path.
///
/// By the time a `Diagnostic` exists its `file` has been resolved to a
/// canonical absolute path; records with no resolvable file reference are
/// dropped during parsing and never materialize.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub file: Utf8PathBuf,
    pub message: String,
    pub severity: Severity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<Range>,
}

impl Diagnostic {
    /// Cross the rendering boundary: drop the grouping key and convert the
    /// optional 1-based range into a concrete 0-based one.
    #[must_use]
    pub fn into_reported(self) -> ReportedDiagnostic {
        let range = RenderRange::from_tool(self.range.as_ref());
        ReportedDiagnostic {
            message: self.message,
            severity: self.severity,
            code: self.code,
            range,
        }
    }
}

/// The sink-facing diagnostic: message, severity, optional code, and a
/// guaranteed well-formed 0-based range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportedDiagnostic {
    pub message: String,
    pub severity: Severity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    pub range: RenderRange,
}
