//! Canonicalization of tool-reported file references.
//!
//! Checkers report files as relative paths, absolute paths, or `file://`
//! URIs depending on platform and output mode. Everything funnels through
//! [`resolve`], which never fails: a reference that cannot be decoded
//! cleanly still produces a usable grouping key.

use camino::{Utf8Component, Utf8Path, Utf8PathBuf};

/// Resolve a raw file reference into a canonical absolute path.
///
/// Existence on disk is not required - diagnostics may point at generated
/// or temporary files - so no step here depends on the filesystem for
/// correctness, only for the cosmetic case folding on Windows.
#[must_use]
pub fn resolve(cwd: &Utf8Path, reference: &str) -> Utf8PathBuf {
    let candidate = match reference.strip_prefix("file://") {
        Some(rest) => percent_decode(rest),
        None => reference.to_string(),
    };

    let mut path = Utf8PathBuf::from(candidate);
    if path.is_relative() {
        path = cwd.join(path);
    }

    fold_fs_case(&normalize(&path))
}

/// Best-effort percent-decoding. Malformed escape sequences pass through
/// untouched instead of failing the whole reference.
#[must_use]
pub fn percent_decode(input: &str) -> String {
    fn hex_val(b: u8) -> Option<u8> {
        match b {
            b'0'..=b'9' => Some(b - b'0'),
            b'a'..=b'f' => Some(b - b'a' + 10),
            b'A'..=b'F' => Some(b - b'A' + 10),
            _ => None,
        }
    }

    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%'
            && i + 2 < bytes.len()
            && let (Some(hi), Some(lo)) = (hex_val(bytes[i + 1]), hex_val(bytes[i + 2]))
        {
            out.push((hi << 4) | lo);
            i += 3;
            continue;
        }
        out.push(bytes[i]);
        i += 1;
    }

    String::from_utf8_lossy(&out).into_owned()
}

/// Lexical normalization: collapse `.` components and resolve `..` without
/// touching the filesystem.
#[must_use]
pub fn normalize(path: &Utf8Path) -> Utf8PathBuf {
    let mut out = Utf8PathBuf::new();
    for component in path.components() {
        match component {
            Utf8Component::CurDir => {}
            Utf8Component::ParentDir => match out.components().next_back() {
                // a `..` at the root has nowhere to go and is dropped
                Some(Utf8Component::RootDir | Utf8Component::Prefix(_)) => {}
                Some(Utf8Component::Normal(_)) => {
                    out.pop();
                }
                _ => out.push(".."),
            },
            other => out.push(other),
        }
    }
    out
}

/// Fold the drive-letter casing on Windows when the path exists on disk.
/// Non-existent paths are returned unmodified; existence stays optional.
#[cfg(windows)]
#[must_use]
pub fn fold_fs_case(path: &Utf8Path) -> Utf8PathBuf {
    if std::fs::symlink_metadata(path.as_std_path()).is_err() {
        return path.to_owned();
    }

    let s = path.as_str();
    let mut bytes = s.as_bytes().to_vec();
    if bytes.len() >= 2 && bytes[1] == b':' && bytes[0].is_ascii_lowercase() {
        bytes[0] = bytes[0].to_ascii_uppercase();
        if let Ok(folded) = String::from_utf8(bytes) {
            return Utf8PathBuf::from(folded);
        }
    }
    path.to_owned()
}

#[cfg(not(windows))]
#[must_use]
pub fn fold_fs_case(path: &Utf8Path) -> Utf8PathBuf {
    path.to_owned()
}
