//! Test case variants.
//!
//! A closed set of six variants. Each one fixes the compiler sub-mode to
//! invoke and whether the invocation itself is expected to succeed. All of
//! them hand the process result to the same evaluator; adding a sub-mode means
//! adding a variant here and nothing else.

use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;

use crate::errors::HarnessError;

/// Compiler sub-mode selected by a variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompilerMode {
    /// Full build producing a wasm module.
    Build,
    /// Compile only (`-c`), producing an object file.
    CompileOnly,
    /// Build whose interest is the generated ABI.
    Abigen,
}

impl CompilerMode {
    /// Arguments placed before the source path.
    pub fn leading_args(&self) -> &'static [&'static str] {
        match self {
            CompilerMode::CompileOnly => &["-c"],
            CompilerMode::Build | CompilerMode::Abigen => &[],
        }
    }
}

/// The kind of a test suite; every test in a suite shares it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum TestKind {
    BuildPass,
    CompilePass,
    AbigenPass,
    BuildFail,
    CompileFail,
    AbigenFail,
}

impl TestKind {
    pub const ALL: [TestKind; 6] = [
        TestKind::BuildPass,
        TestKind::CompilePass,
        TestKind::AbigenPass,
        TestKind::BuildFail,
        TestKind::CompileFail,
        TestKind::AbigenFail,
    ];

    pub fn mode(&self) -> CompilerMode {
        match self {
            TestKind::BuildPass | TestKind::BuildFail => CompilerMode::Build,
            TestKind::CompilePass | TestKind::CompileFail => CompilerMode::CompileOnly,
            TestKind::AbigenPass | TestKind::AbigenFail => CompilerMode::Abigen,
        }
    }

    /// Declared outcome: whether the compiler invocation itself should succeed.
    pub fn expects_success(&self) -> bool {
        matches!(
            self,
            TestKind::BuildPass | TestKind::CompilePass | TestKind::AbigenPass
        )
    }

    /// Suite directory name for this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            TestKind::BuildPass => "build-pass",
            TestKind::CompilePass => "compile-pass",
            TestKind::AbigenPass => "abigen-pass",
            TestKind::BuildFail => "build-fail",
            TestKind::CompileFail => "compile-fail",
            TestKind::AbigenFail => "abigen-fail",
        }
    }
}

impl fmt::Display for TestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TestKind {
    type Err = HarnessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TestKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| HarnessError::UnknownKind {
                name: s.to_string(),
            })
    }
}
