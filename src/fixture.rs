//! Fixture-local metadata.
//!
//! A fixture source `hello.cpp` may carry a sibling `hello.json` (or
//! `hello.yaml` / `hello.yml`) listing one entry per test case:
//!
//! ```json
//! {
//!   "tests": [
//!     {
//!       "compile_flags": ["--abi-version=1.2"],
//!       "proto_files": ["hello.proto"],
//!       "proto_dir": "protos",
//!       "expected": { "abi-file": "hello.abi" }
//!     }
//!   ]
//! }
//! ```
//!
//! A fixture without metadata yields a single entry with no expectations.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::errors::HarnessError;
use crate::expectation::Expectation;

/// One entry of a fixture's `tests` list.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct FixtureEntry {
    #[serde(default)]
    pub compile_flags: Option<Vec<String>>,
    #[serde(default)]
    pub proto_files: Vec<String>,
    /// Schema directory, relative to the fixture's own directory.
    #[serde(default)]
    pub proto_dir: Option<String>,
    #[serde(default)]
    pub expected: Option<Expectation>,
}

#[derive(Debug, Deserialize)]
struct FixtureFile {
    #[serde(default)]
    tests: Vec<FixtureEntry>,
}

const METADATA_EXTENSIONS: [&str; 3] = ["json", "yaml", "yml"];

/// Finds the metadata file sitting next to a fixture source, if any.
pub fn metadata_path(source: &Path) -> Option<PathBuf> {
    METADATA_EXTENSIONS
        .iter()
        .map(|ext| source.with_extension(ext))
        .find(|path| path.is_file())
}

/// Loads the test entries of a fixture source.
pub fn load_entries(source: &Path) -> Result<Vec<FixtureEntry>, HarnessError> {
    let Some(path) = metadata_path(source) else {
        return Ok(vec![FixtureEntry::default()]);
    };
    let content = fs::read_to_string(&path).map_err(|e| HarnessError::io(&path, e))?;
    parse_entries(&path, &content)
}

/// Parses fixture metadata; the format follows the file extension.
pub fn parse_entries(path: &Path, content: &str) -> Result<Vec<FixtureEntry>, HarnessError> {
    let is_yaml = path
        .extension()
        .is_some_and(|ext| ext == "yaml" || ext == "yml");
    let parsed: FixtureFile = if is_yaml {
        serde_yaml::from_str(content).map_err(|e| malformed(path, e))?
    } else {
        serde_json::from_str(content).map_err(|e| malformed(path, e))?
    };
    if parsed.tests.is_empty() {
        return Ok(vec![FixtureEntry::default()]);
    }
    Ok(parsed.tests)
}

fn malformed(path: &Path, err: impl std::fmt::Display) -> HarnessError {
    HarnessError::Fixture {
        path: path.to_path_buf(),
        message: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_json_entries() {
        let entries = parse_entries(
            Path::new("hello.json"),
            r#"{"tests": [
                {"compile_flags": ["-O2"], "expected": {"exit-code": 1}},
                {"proto_files": ["a.proto", "b.proto"], "proto_dir": "protos"}
            ]}"#,
        )
        .unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].compile_flags, Some(vec!["-O2".to_string()]));
        assert_eq!(
            entries[0].expected.as_ref().and_then(|e| e.exit_code()),
            Some(1)
        );
        assert_eq!(entries[1].proto_files, vec!["a.proto", "b.proto"]);
        assert_eq!(entries[1].proto_dir.as_deref(), Some("protos"));
    }

    #[test]
    fn parses_yaml_entries() {
        let entries = parse_entries(
            Path::new("hello.yaml"),
            "tests:\n  - expected:\n      stderr: \"undefined reference\"\n",
        )
        .unwrap();
        assert_eq!(
            entries[0].expected.as_ref().and_then(|e| e.stderr()),
            Some("undefined reference")
        );
    }

    #[test]
    fn empty_tests_list_yields_one_default_entry() {
        let entries = parse_entries(Path::new("x.json"), r#"{"tests": []}"#).unwrap();
        assert_eq!(entries, vec![FixtureEntry::default()]);
    }

    #[test]
    fn malformed_metadata_is_a_fixture_error() {
        let err = parse_entries(Path::new("x.json"), "{ not json").unwrap_err();
        assert!(matches!(err, HarnessError::Fixture { .. }));
    }

    #[test]
    fn missing_metadata_yields_one_default_entry() {
        let entries = load_entries(Path::new("/nonexistent/dir/hello.cpp")).unwrap();
        assert_eq!(entries, vec![FixtureEntry::default()]);
    }
}
