//! Test cases, suites and compiler invocations.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::errors::HarnessError;
use crate::expectation::Expectation;
use crate::fixture::{self, FixtureEntry};
use crate::variant::TestKind;

// ============================================================================
// SUITES
// ============================================================================

/// A directory of fixtures sharing one [`TestKind`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestSuite {
    pub name: String,
    pub directory: PathBuf,
    pub kind: TestKind,
}

impl TestSuite {
    pub fn new(name: impl Into<String>, directory: impl Into<PathBuf>, kind: TestKind) -> Self {
        Self {
            name: name.into(),
            directory: directory.into(),
            kind,
        }
    }

    /// Builds a suite whose name and kind come from the directory name,
    /// e.g. `tests/toolchain/abigen-pass`.
    pub fn from_directory(directory: impl Into<PathBuf>) -> Result<Self, HarnessError> {
        let directory = directory.into();
        let name = directory
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let kind = name.parse()?;
        Ok(Self {
            name,
            directory,
            kind,
        })
    }

    /// Loads every test case of a fixture source in this suite.
    pub fn test_cases(&self, source: impl AsRef<Path>) -> Result<Vec<TestCase>, HarnessError> {
        let source = source.as_ref();
        let entries = fixture::load_entries(source)?;
        Ok(entries
            .into_iter()
            .enumerate()
            .map(|(index, entry)| TestCase::new(source, entry, index, self))
            .collect())
    }
}

// ============================================================================
// TEST CASES
// ============================================================================

/// One fixture entry: a source file, its metadata and its position.
///
/// Immutable once constructed. Names are derived at construction:
/// `base` is the source file name up to the first `.`, `name` is
/// `<base>_<index>` and `full_name` is `<suite>/<name>`.
#[derive(Debug, Clone, PartialEq)]
pub struct TestCase {
    source: PathBuf,
    entry: FixtureEntry,
    index: usize,
    suite: TestSuite,
    base: String,
    name: String,
    full_name: String,
}

impl TestCase {
    pub fn new(
        source: impl Into<PathBuf>,
        entry: FixtureEntry,
        index: usize,
        suite: &TestSuite,
    ) -> Self {
        let source = source.into();
        let base = source
            .file_name()
            .map(|n| n.to_string_lossy())
            .and_then(|n| n.split('.').next().map(str::to_string))
            .unwrap_or_default();
        let name = format!("{}_{}", base, index);
        let full_name = format!("{}/{}", suite.name, name);
        Self {
            source,
            entry,
            index,
            suite: suite.clone(),
            base,
            name,
            full_name,
        }
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn entry(&self) -> &FixtureEntry {
        &self.entry
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn suite(&self) -> &TestSuite {
        &self.suite
    }

    pub fn kind(&self) -> TestKind {
        self.suite.kind
    }

    pub fn expectation(&self) -> Option<&Expectation> {
        self.entry.expected.as_ref()
    }

    /// Source file name up to the first `.`; artifacts are named after it.
    pub fn base_name(&self) -> &str {
        &self.base
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    /// Artifact locations inside the directory the compiler ran in.
    pub fn artifacts_in(&self, work_dir: &Path) -> Artifacts {
        Artifacts {
            abi: work_dir.join(format!("{}.abi", self.base)),
            wasm: work_dir.join(format!("{}.wasm", self.base)),
        }
    }

    /// Isolated work directory for this case under `root`.
    pub fn work_dir_under(&self, root: &Path) -> PathBuf {
        root.join(&self.suite.name).join(&self.name)
    }

    /// Derives the compiler command line for this case.
    pub fn invocation(&self, compiler: &Path) -> InvocationSpec {
        let mut args: Vec<OsString> = self
            .kind()
            .mode()
            .leading_args()
            .iter()
            .map(OsString::from)
            .collect();
        args.push(absolute(&self.source).into_os_string());

        if let Some(flags) = &self.entry.compile_flags {
            args.extend(flags.iter().map(OsString::from));
        }

        if !self.entry.proto_files.is_empty() {
            args.push("--protobuf-files".into());
            args.push(self.entry.proto_files.join(";").into());
        }

        if let Some(proto_dir) = self.entry.proto_dir.as_deref().filter(|d| !d.is_empty()) {
            let fixture_dir = absolute(&self.source)
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_default();
            args.push("--protobuf-dir".into());
            args.push(fixture_dir.join(proto_dir).into_os_string());
        }

        InvocationSpec {
            program: compiler.to_path_buf(),
            args,
        }
    }
}

impl std::fmt::Display for TestCase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.full_name)
    }
}

fn absolute(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

// ============================================================================
// INVOCATION
// ============================================================================

/// Resolved compiler command line for one test case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationSpec {
    pub program: PathBuf,
    pub args: Vec<OsString>,
}

impl InvocationSpec {
    /// Space-joined rendering for logs.
    pub fn command_line(&self) -> String {
        let mut line = self.program.display().to_string();
        for arg in &self.args {
            line.push(' ');
            line.push_str(&arg.to_string_lossy());
        }
        line
    }
}

/// Paths of the artifacts read back after an invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifacts {
    pub abi: PathBuf,
    pub wasm: PathBuf,
}
