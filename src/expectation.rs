//! # Expectation Model
//!
//! Declarative description of what "success" means for one test case beyond
//! the declared outcome of its variant. Every field is optional; a field that
//! is absent, empty or (for the exit code) zero adds no check.
//!
//! ```json
//! {
//!   "exit-code": 1,
//!   "stderr": "cannot find symbol",
//!   "abi-file": "hello.abi",
//!   "wasm": "0061736d01000000"
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::Value as Json;

/// Expected results for one test case, as written in fixture metadata.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Expectation {
    #[serde(default)]
    pub exit_code: Option<i32>,
    #[serde(default)]
    pub stderr: Option<String>,
    /// Inline ABI: a JSON document encoded as a string, or the document itself.
    #[serde(default)]
    pub abi: Option<Json>,
    /// ABI document path, relative to the suite directory.
    #[serde(default)]
    pub abi_file: Option<String>,
    /// Expected wasm bytes as a hex string without separators.
    #[serde(default)]
    pub wasm: Option<String>,
}

/// Where the expected ABI document comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum AbiSource<'a> {
    Inline(&'a Json),
    File(&'a str),
}

impl Expectation {
    /// True when no further check is configured.
    pub fn is_empty(&self) -> bool {
        self.exit_code().is_none()
            && self.stderr().is_none()
            && self.abi_source().is_none()
            && self.wasm().is_none()
    }

    /// Expected exit code. Zero counts as absent.
    pub fn exit_code(&self) -> Option<i32> {
        self.exit_code.filter(|code| *code != 0)
    }

    pub fn stderr(&self) -> Option<&str> {
        self.stderr.as_deref().filter(|s| !s.is_empty())
    }

    /// Inline `abi` wins over `abi-file` when both are present.
    pub fn abi_source(&self) -> Option<AbiSource<'_>> {
        match &self.abi {
            Some(json) if !is_blank(json) => return Some(AbiSource::Inline(json)),
            _ => {}
        }
        self.abi_file
            .as_deref()
            .filter(|path| !path.is_empty())
            .map(AbiSource::File)
    }

    pub fn wasm(&self) -> Option<&str> {
        self.wasm.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }
}

impl AbiSource<'_> {
    /// Loads and parses the expected ABI document.
    ///
    /// File sources are resolved against `suite_dir`. The error is a
    /// human-readable reason suitable for a failure message.
    pub fn load(&self, suite_dir: &Path) -> Result<Json, String> {
        match self {
            AbiSource::Inline(Json::String(text)) => serde_json::from_str(text)
                .map_err(|e| format!("expected abi is not valid JSON: {}", e)),
            AbiSource::Inline(json) => Ok((*json).clone()),
            AbiSource::File(relative) => {
                let path: PathBuf = suite_dir.join(relative);
                let text = fs::read_to_string(&path)
                    .map_err(|e| format!("failed to read expected abi {}: {}", path.display(), e))?;
                serde_json::from_str(&text).map_err(|e| {
                    format!("expected abi {} is not valid JSON: {}", path.display(), e)
                })
            }
        }
    }
}

fn is_blank(json: &Json) -> bool {
    match json {
        Json::Null => true,
        Json::String(s) => s.is_empty(),
        _ => false,
    }
}
