//! Output formatting and diagnostic display

use camino::Utf8Path;
use serde::Serialize;
use verdict_model::{ReportedDiagnostic, RenderRange, Severity};

#[derive(Serialize)]
pub struct SerializableDiagnostic {
    pub path: String,
    pub severity: Severity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    pub message: String,
    pub range: RenderRange,
}

impl SerializableDiagnostic {
    pub fn new(path: &Utf8Path, diag: &ReportedDiagnostic) -> Self {
        Self {
            path: path.to_string(),
            severity: diag.severity,
            code: diag.code.clone(),
            message: diag.message.clone(),
            range: diag.range,
        }
    }
}

/// Print one diagnostic the way compilers do, 1-based for humans.
pub fn print_diagnostic(path: &Utf8Path, diag: &ReportedDiagnostic) {
    let line = diag.range.start_line + 1;
    let col = diag.range.start_column + 1;
    match &diag.code {
        Some(code) => println!(
            "{path}:{line}:{col}: {sev}[{code}]: {msg}",
            sev = diag.severity,
            msg = diag.message
        ),
        None => println!(
            "{path}:{line}:{col}: {sev}: {msg}",
            sev = diag.severity,
            msg = diag.message
        ),
    }
}
