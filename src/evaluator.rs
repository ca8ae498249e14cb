//! Outcome evaluation.
//!
//! Decides whether one compiler run passes. Checks run strictly in order and
//! stop at the first failure:
//!
//! 1. declared outcome of the variant (success expected vs. failure expected)
//! 2. no expectation configured: pass
//! 3. exit code
//! 4. stderr, literal substring or dot-matches-newline regex
//! 5. ABI document, compared in canonical form
//! 6. wasm bytes, compared as hex
//!
//! Evaluation is a pure function of the test case, the process result and
//! the artifacts on disk; it returns a [`Verdict`] and mutates nothing.

use serde_json::Value as Json;
use tracing::debug;

use crate::canonical::{self, canonical_string};
use crate::errors::{FailureKind, TestFailure};
use crate::expectation::Expectation;
use crate::process::ProcessResult;
use crate::test_case::{Artifacts, TestCase};

/// Terminal state of one test case.
#[derive(Debug, Clone)]
pub enum Verdict {
    Passed,
    Failed(TestFailure),
}

impl Verdict {
    pub fn is_success(&self) -> bool {
        matches!(self, Verdict::Passed)
    }

    pub fn failure(&self) -> Option<&TestFailure> {
        match self {
            Verdict::Passed => None,
            Verdict::Failed(failure) => Some(failure),
        }
    }

    pub fn into_result(self) -> Result<(), TestFailure> {
        match self {
            Verdict::Passed => Ok(()),
            Verdict::Failed(failure) => Err(failure),
        }
    }
}

impl From<Result<(), TestFailure>> for Verdict {
    fn from(result: Result<(), TestFailure>) -> Self {
        match result {
            Ok(()) => Verdict::Passed,
            Err(failure) => Verdict::Failed(failure),
        }
    }
}

/// Evaluates a finished compiler run against the case's declared outcome and
/// expectation. Artifacts are only read when an ABI or wasm check is configured.
pub fn evaluate(case: &TestCase, result: &ProcessResult, artifacts: &Artifacts) -> Verdict {
    echo(result);
    check(case, result, artifacts).into()
}

fn echo(result: &ProcessResult) {
    debug!(stdout = %result.stdout_text().trim(), "compiler stdout");
    debug!(stderr = %result.stderr_text().trim(), "compiler stderr");
}

fn check(case: &TestCase, result: &ProcessResult, artifacts: &Artifacts) -> Result<(), TestFailure> {
    check_declared_outcome(case, result)?;

    let Some(expected) = case.expectation().filter(|e| !e.is_empty()) else {
        return Ok(());
    };

    check_exit_code(case, expected, result)?;
    check_stderr(case, expected, result)?;
    check_abi(case, expected, artifacts)?;
    check_wasm(case, expected, artifacts)?;
    Ok(())
}

fn check_declared_outcome(case: &TestCase, result: &ProcessResult) -> Result<(), TestFailure> {
    let expects_success = case.kind().expects_success();
    if expects_success && result.code > 0 {
        return Err(TestFailure::new(
            FailureKind::DeclaredOutcome,
            format!(
                "{} failed with the following stderr {}",
                case.full_name(),
                result.stderr_text().trim()
            ),
            case,
        ));
    }
    if !expects_success && result.code == 0 {
        return Err(TestFailure::new(
            FailureKind::DeclaredOutcome,
            "expected to fail compilation/linking but didn't.",
            case,
        ));
    }
    Ok(())
}

fn check_exit_code(
    case: &TestCase,
    expected: &Expectation,
    result: &ProcessResult,
) -> Result<(), TestFailure> {
    match expected.exit_code() {
        Some(code) if code != result.code => Err(TestFailure::new(
            FailureKind::ExitCode,
            format!("expected {} exit code but got {}", code, result.code),
            case,
        )),
        _ => Ok(()),
    }
}

fn check_stderr(
    case: &TestCase,
    expected: &Expectation,
    result: &ProcessResult,
) -> Result<(), TestFailure> {
    let Some(pattern) = expected.stderr() else {
        return Ok(());
    };
    let actual = result.stderr_text();
    if canonical::stderr_matches(pattern, &actual) {
        return Ok(());
    }
    Err(TestFailure::new(
        FailureKind::Stderr,
        format!("expected {} stderr but got {}", pattern, actual),
        case,
    ))
}

fn check_abi(
    case: &TestCase,
    expected: &Expectation,
    artifacts: &Artifacts,
) -> Result<(), TestFailure> {
    let Some(source) = expected.abi_source() else {
        return Ok(());
    };
    let abi_failure = |message: String| TestFailure::new(FailureKind::Abi, message, case);

    let expected_doc = source.load(&case.suite().directory).map_err(abi_failure)?;
    let actual_doc = read_json(&artifacts.abi).map_err(abi_failure)?;

    let expected_str = canonical_string(&expected_doc);
    let actual_str = canonical_string(&actual_doc);
    if expected_str == actual_str {
        return Ok(());
    }

    let diff = canonical::line_diff(&expected_str, &actual_str);
    debug!(test = case.full_name(), "abi mismatch\n{}", diff);
    Err(abi_failure("actual abi did not match expected abi".to_string()).with_diff(diff))
}

fn read_json(path: &std::path::Path) -> Result<Json, String> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| format!("failed to read generated abi {}: {}", path.display(), e))?;
    serde_json::from_str(&text)
        .map_err(|e| format!("generated abi {} is not valid JSON: {}", path.display(), e))
}

fn check_wasm(
    case: &TestCase,
    expected: &Expectation,
    artifacts: &Artifacts,
) -> Result<(), TestFailure> {
    let Some(expected_hex) = expected.wasm() else {
        return Ok(());
    };
    let actual_hex = canonical::hex_file(&artifacts.wasm).map_err(|e| {
        TestFailure::new(
            FailureKind::Wasm,
            format!(
                "failed to read generated wasm {}: {}",
                artifacts.wasm.display(),
                e
            ),
            case,
        )
    })?;
    if canonical::hex_equal(expected_hex, &actual_hex) {
        return Ok(());
    }
    Err(TestFailure::new(
        FailureKind::Wasm,
        "actual wasm did not match expected wasm",
        case,
    ))
}
