//! Error types for the toolchain tester.
//!
//! Two families live here:
//!
//! - [`TestFailure`] is the verdict channel. Every failed check, a timed-out
//!   compiler and a compiler that could not be spawned all surface as a
//!   `TestFailure` carrying the originating [`TestCase`] so a caller can
//!   attribute and aggregate failures across a suite.
//! - [`HarnessError`] covers problems outside a single verdict: fixture
//!   metadata that cannot be read, an unknown suite kind, a work directory
//!   that cannot be created.

use std::fmt;
use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

use crate::test_case::TestCase;

// ============================================================================
// FAILURE KINDS
// ============================================================================

/// Classifies a failed verdict.
///
/// The five check kinds mirror the evaluation order of the outcome
/// evaluator. `Timeout` and `Invocation` describe runs that never produced a
/// complete process result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// The compiler succeeded or failed contrary to the variant's declared outcome.
    DeclaredOutcome,
    /// The exit code differed from the expected one.
    ExitCode,
    /// Neither the literal nor the regex form of the expected stderr matched.
    Stderr,
    /// The generated ABI differed structurally from the expected one.
    Abi,
    /// The generated wasm bytes differed from the expected hex string.
    Wasm,
    /// The compiler did not exit within the configured bound.
    Timeout,
    /// The compiler could not be started or its output could not be collected.
    Invocation,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::DeclaredOutcome => "declared-outcome",
            FailureKind::ExitCode => "exit-code",
            FailureKind::Stderr => "stderr",
            FailureKind::Abi => "abi",
            FailureKind::Wasm => "wasm",
            FailureKind::Timeout => "timeout",
            FailureKind::Invocation => "invocation",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// TEST FAILURE - the typed failure raised by the evaluator
// ============================================================================

/// A failed verdict for one test case.
#[derive(Debug, Clone, Error, Diagnostic)]
#[error("{message}")]
#[diagnostic(code(cdt_toolchain_tester::test_failure))]
pub struct TestFailure {
    pub kind: FailureKind,
    pub message: String,
    /// The test case that produced this failure.
    pub test: TestCase,
    /// Line diff of the canonical ABI documents, only set for ABI mismatches.
    #[help]
    pub diff: Option<String>,
}

impl TestFailure {
    pub fn new(kind: FailureKind, message: impl Into<String>, test: &TestCase) -> Self {
        Self {
            kind,
            message: message.into(),
            test: test.clone(),
            diff: None,
        }
    }

    pub fn with_diff(mut self, diff: impl Into<String>) -> Self {
        self.diff = Some(diff.into());
        self
    }

    /// Full suite-qualified name of the failing test.
    pub fn test_name(&self) -> &str {
        self.test.full_name()
    }
}

// ============================================================================
// HARNESS ERRORS - setup problems outside a single verdict
// ============================================================================

#[derive(Debug, Error, Diagnostic)]
pub enum HarnessError {
    #[error("failed to read {}: {source}", path.display())]
    #[diagnostic(code(cdt_toolchain_tester::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed fixture metadata in {}: {message}", path.display())]
    #[diagnostic(
        code(cdt_toolchain_tester::fixture),
        help("fixture metadata is a mapping with a 'tests' list of entries")
    )]
    Fixture { path: PathBuf, message: String },

    #[error("unknown test kind '{name}'")]
    #[diagnostic(
        code(cdt_toolchain_tester::kind),
        help("use one of: build-pass, compile-pass, abigen-pass, build-fail, compile-fail, abigen-fail")
    )]
    UnknownKind { name: String },

    #[error("failed to prepare work directory {}: {source}", path.display())]
    #[diagnostic(code(cdt_toolchain_tester::work_dir))]
    WorkDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl HarnessError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        HarnessError::Io {
            path: path.into(),
            source,
        }
    }
}
