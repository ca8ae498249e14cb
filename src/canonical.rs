//! Canonical comparison of compiler artifacts.
//!
//! Structured documents are compared through a canonical form so that key
//! order and absent-versus-empty collections never cause a false mismatch.
//! Binary artifacts are compared as lowercase hex, and stderr is matched as a
//! literal substring or a dot-matches-newline regex.

use std::fs;
use std::io;
use std::path::Path;

use difference::{Changeset, Difference};
use regex::RegexBuilder;
use serde_json::{Map, Value as Json};
use tracing::warn;

// ============================================================================
// STRUCTURED DOCUMENTS
// ============================================================================

/// Canonicalizes a JSON document.
///
/// Keys whose value canonicalizes to empty (`null`, `{}`, `[]`) are removed
/// and the remaining keys are sorted at every nesting level. Sequence
/// elements are canonicalized in place but never dropped, so sequence length
/// is preserved. A document that is itself empty canonicalizes to `null`.
pub fn canonicalize(doc: &Json) -> Json {
    match doc {
        Json::Object(map) => {
            let mut entries: Vec<(&String, Json)> = map
                .iter()
                .map(|(key, value)| (key, canonicalize(value)))
                .filter(|(_, value)| !is_empty(value))
                .collect();
            if entries.is_empty() {
                return Json::Null;
            }
            entries.sort_by(|a, b| a.0.cmp(b.0));
            let mut sorted = Map::new();
            for (key, value) in entries {
                sorted.insert(key.clone(), value);
            }
            Json::Object(sorted)
        }
        Json::Array(items) if items.is_empty() => Json::Null,
        Json::Array(items) => Json::Array(items.iter().map(canonicalize_element).collect()),
        scalar => scalar.clone(),
    }
}

// Elements keep their position even when empty.
fn canonicalize_element(doc: &Json) -> Json {
    match (doc, canonicalize(doc)) {
        (Json::Object(_), Json::Null) => Json::Object(Map::new()),
        (Json::Array(_), Json::Null) => Json::Array(Vec::new()),
        (_, canonical) => canonical,
    }
}

fn is_empty(value: &Json) -> bool {
    match value {
        Json::Null => true,
        Json::Object(map) => map.is_empty(),
        Json::Array(items) => items.is_empty(),
        _ => false,
    }
}

/// Serializes the canonical form with two-space indentation and sorted keys.
pub fn canonical_string(doc: &Json) -> String {
    // Serializing a `serde_json::Value` cannot fail.
    serde_json::to_string_pretty(&canonicalize(doc)).unwrap_or_default()
}

/// Two documents are equal iff their canonical strings are identical.
pub fn documents_equal(expected: &Json, actual: &Json) -> bool {
    canonical_string(expected) == canonical_string(actual)
}

/// Line-level diff of two texts, rendered with ` `, `-` and `+` prefixes.
pub fn line_diff(expected: &str, actual: &str) -> String {
    let changeset = Changeset::new(expected, actual, "\n");
    let mut out = String::new();
    for diff in &changeset.diffs {
        let (prefix, text) = match diff {
            Difference::Same(text) => (' ', text),
            Difference::Rem(text) => ('-', text),
            Difference::Add(text) => ('+', text),
        };
        for line in text.split('\n') {
            out.push(prefix);
            out.push_str(line);
            out.push('\n');
        }
    }
    out
}

// ============================================================================
// BINARY ARTIFACTS
// ============================================================================

/// Reads a binary file and hex-encodes it with no separators.
pub fn hex_file(path: &Path) -> io::Result<String> {
    fs::read(path).map(hex::encode)
}

/// Exact comparison of two hex strings, ignoring case and surrounding whitespace.
pub fn hex_equal(expected: &str, actual: &str) -> bool {
    expected.trim().eq_ignore_ascii_case(actual.trim())
}

// ============================================================================
// STDERR
// ============================================================================

/// Matches expected stderr against the actual stderr.
///
/// Succeeds when `expected` is a literal substring of `actual`, or when it
/// matches as a regular expression anywhere in `actual` with `.` matching
/// newlines. An expected string that is not a valid regex can still match
/// literally.
pub fn stderr_matches(expected: &str, actual: &str) -> bool {
    if actual.contains(expected) {
        return true;
    }
    match RegexBuilder::new(expected).dot_matches_new_line(true).build() {
        Ok(re) => re.is_match(actual),
        Err(e) => {
            warn!(pattern = expected, error = %e, "expected stderr is not a valid regex");
            false
        }
    }
}
