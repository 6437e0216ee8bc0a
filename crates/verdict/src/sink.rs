//! In-memory diagnostics sink for the CLI.

use camino::{Utf8Path, Utf8PathBuf};
use verdict_core::DiagnosticsSink;
use verdict_model::ReportedDiagnostic;

/// Collects the pipeline's clear/set calls so the CLI can print the batch
/// after the run. `set` replaces any earlier entry for the same file, the
/// same contract an editor's diagnostic collection honors.
#[derive(Debug, Default)]
pub struct CollectedDiagnostics {
    files: Vec<(Utf8PathBuf, Vec<ReportedDiagnostic>)>,
}

impl CollectedDiagnostics {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Files in the order they were reported.
    #[must_use]
    pub fn files(&self) -> &[(Utf8PathBuf, Vec<ReportedDiagnostic>)] {
        &self.files
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.files.iter().map(|(_, d)| d.len()).sum()
    }
}

impl DiagnosticsSink for CollectedDiagnostics {
    fn clear(&mut self) {
        self.files.clear();
    }

    fn set(&mut self, file: &Utf8Path, diagnostics: Vec<ReportedDiagnostic>) {
        match self.files.iter_mut().find(|(f, _)| f == file) {
            Some((_, existing)) => *existing = diagnostics,
            None => self.files.push((file.to_owned(), diagnostics)),
        }
    }
}
