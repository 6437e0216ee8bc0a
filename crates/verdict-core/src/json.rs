//! Structured (JSON) checker output.
//!
//! Checker JSON is not contractually guaranteed, so this decodes into
//! `serde_json::Value` and applies defaulting field by field instead of
//! assuming a rigid schema. Records without a usable `file` string are
//! dropped whole; every other missing field has a harmless default.

use camino::Utf8Path;
use serde_json::Value;
use verdict_model::{Diagnostic, Position, Range, Severity};

use crate::paths;

/// Parse a payload believed to be JSON.
///
/// Returns `None` only when the text is not decodable JSON at all - that is
/// the signal for the text-parser fallback one level up. A decodable payload
/// of unexpected shape yields `Some(vec![])`: a valid "no problems" result
/// that must not trigger the fallback.
#[must_use]
pub fn parse_diagnostics(raw: &str, cwd: &Utf8Path) -> Option<Vec<Diagnostic>> {
    let data: Value = serde_json::from_str(raw).ok()?;

    // Accept either a bare list or `{ "diagnostics": [...] }`.
    static EMPTY: &[Value] = &[];
    let records = match &data {
        Value::Array(items) => items.as_slice(),
        Value::Object(obj) => match obj.get("diagnostics") {
            Some(Value::Array(items)) => items.as_slice(),
            _ => EMPTY,
        },
        _ => EMPTY,
    };

    let mut out = Vec::with_capacity(records.len());
    for record in records {
        let Some(file) = record.get("file").and_then(Value::as_str) else {
            tracing::debug!("dropping diagnostic record without a file field");
            continue;
        };
        if file.is_empty() {
            continue;
        }

        out.push(Diagnostic {
            file: paths::resolve(cwd, file),
            message: message_of(record),
            severity: Severity::normalize(record.get("severity").and_then(Value::as_str)),
            code: record.get("code").and_then(code_string),
            range: range_of(record),
        });
    }
    Some(out)
}

/// `message` wins, `msg` is the fallback, absent means empty. Non-string
/// scalars are stringified rather than dropped.
fn message_of(record: &Value) -> String {
    match record.get("message").or_else(|| record.get("msg")) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

/// Codes arrive as strings or numbers; downstream always wants display text.
fn code_string(code: &Value) -> Option<String> {
    match code {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn range_of(record: &Value) -> Option<Range> {
    if let Some(start) = record.get("range").and_then(|r| r.get("start")) {
        let line = int_or(start.get("line"), 1);
        let column = int_or(start.get("column"), 1);
        let end = record
            .get("range")
            .and_then(|r| r.get("end"))
            .map(|e| Position {
                line: int_or(e.get("line"), line),
                column: int_or(e.get("column"), column),
            });
        return Some(Range {
            start: Position { line, column },
            end,
        });
    }

    if record.get("line").is_some() || record.get("column").is_some() {
        return Some(Range {
            start: Position {
                line: int_or(record.get("line"), 1),
                column: int_or(record.get("column"), 1),
            },
            end: None,
        });
    }

    None
}

/// Coerce a possibly-corrupt numeric field. Accepts JSON numbers (floats
/// truncated) and numeric strings; negatives and garbage fall back.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn int_or(value: Option<&Value>, default: u32) -> u32 {
    match value {
        Some(Value::Number(n)) => n
            .as_u64()
            .and_then(|v| u32::try_from(v).ok())
            .or_else(|| {
                n.as_f64()
                    .filter(|f| f.is_finite() && *f >= 0.0)
                    .map(|f| f as u32)
            })
            .unwrap_or(default),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(default),
        _ => default,
    }
}
