//! Grouping and sink reporting.
//!
//! Diagnostics are bucketed by canonical file path, preserving insertion
//! order within a file and first-appearance order across files. Reporting
//! is replace-not-merge: the sink is cleared once per run and then fed one
//! `set` per file, so nothing survives a run unless re-reported.

use camino::{Utf8Path, Utf8PathBuf};
use verdict_model::{Diagnostic, ReportedDiagnostic};

use crate::DiagnosticsSink;

/// Bucket normalized diagnostics by file, rendering ranges at the boundary.
///
/// Batches are small (one checker run), so a linear scan over the group
/// list keeps first-appearance ordering without an index structure.
#[must_use]
pub fn by_file(diagnostics: Vec<Diagnostic>) -> Vec<(Utf8PathBuf, Vec<ReportedDiagnostic>)> {
    let mut groups: Vec<(Utf8PathBuf, Vec<ReportedDiagnostic>)> = Vec::new();
    for diag in diagnostics {
        // Parsers guarantee a resolved file; guard anyway so a stray empty
        // key can never become a grouping bucket.
        if diag.file.as_str().is_empty() {
            continue;
        }
        let file = diag.file.clone();
        let reported = diag.into_reported();
        match groups.iter_mut().find(|(existing, _)| *existing == file) {
            Some((_, list)) => list.push(reported),
            None => groups.push((file, vec![reported])),
        }
    }
    groups
}

/// Hand a grouped batch to the sink with full-replacement semantics.
///
/// An empty batch still clears `active_file` explicitly - without that, a
/// file whose last issue was just fixed would keep showing stale entries.
pub fn report(
    sink: &mut dyn DiagnosticsSink,
    groups: Vec<(Utf8PathBuf, Vec<ReportedDiagnostic>)>,
    active_file: &Utf8Path,
) {
    sink.clear();

    if groups.is_empty() {
        sink.set(active_file, Vec::new());
        return;
    }

    for (file, diagnostics) in groups {
        sink.set(&file, diagnostics);
    }
}
