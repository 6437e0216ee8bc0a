//! Project-root discovery.
//!
//! The checker runs from the project root so relative paths in its output
//! resolve the way they would for the user's own shell. The root is found
//! by walking up from the checked file toward well-known markers.

use camino::{Utf8Path, Utf8PathBuf};

/// Markers that identify a project root, most specific first.
const ROOT_MARKERS: &[&str] = &[
    ".verdict.toml",
    "vitte.toml",
    "Cargo.toml",
    "package.json",
    ".git",
];

/// Walk-up cap; deeper trees are not plausible project layouts.
const MAX_ASCENT: usize = 50;

/// Find the working directory for a check triggered by `file`.
///
/// Walks parent directories looking for a marker, falling back to the
/// file's own directory (or `.` for a bare filename).
#[must_use]
pub fn root_for(file: &Utf8Path) -> Utf8PathBuf {
    let start = if file.is_dir() {
        file.to_owned()
    } else {
        parent_of(file)
    };

    let mut dir = start.clone();
    for _ in 0..MAX_ASCENT {
        if ROOT_MARKERS
            .iter()
            .any(|marker| dir.join(marker).exists())
        {
            return dir;
        }
        match dir.parent() {
            Some(parent) if parent != dir => dir = parent.to_owned(),
            _ => break,
        }
    }

    start
}

fn parent_of(file: &Utf8Path) -> Utf8PathBuf {
    match file.parent() {
        Some(p) if !p.as_str().is_empty() => p.to_owned(),
        _ => Utf8PathBuf::from("."),
    }
}
