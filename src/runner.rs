//! Runs test cases end to end: derive the invocation, prepare the work
//! directory, invoke the compiler and evaluate the outcome.

use std::fs;
use std::path::PathBuf;

use tracing::info;

use crate::config::RunnerConfig;
use crate::errors::{FailureKind, HarnessError, TestFailure};
use crate::evaluator::{self, Verdict};
use crate::process::{self, InvokeError};
use crate::test_case::TestCase;

/// Executes test cases with a shared configuration.
#[derive(Debug, Clone)]
pub struct TestRunner {
    config: RunnerConfig,
}

impl TestRunner {
    pub fn new(config: RunnerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    /// Directory the compiler runs in for `case`.
    pub fn work_dir(&self, case: &TestCase) -> PathBuf {
        if self.config.isolate_artifacts {
            case.work_dir_under(&self.config.work_root)
        } else {
            self.config.work_root.clone()
        }
    }

    /// Runs one test case and returns its verdict.
    ///
    /// A timed-out or unspawnable compiler is a failed verdict; only a work
    /// directory that cannot be created is an error.
    pub fn run(&self, case: &TestCase) -> Result<Verdict, HarnessError> {
        let work_dir = self.work_dir(case);
        fs::create_dir_all(&work_dir).map_err(|source| HarnessError::WorkDir {
            path: work_dir.clone(),
            source,
        })?;

        let spec = case.invocation(&self.config.compiler_path());
        let verdict = match process::invoke(&spec, &work_dir, self.config.timeout) {
            Ok(result) => evaluator::evaluate(case, &result, &case.artifacts_in(&work_dir)),
            Err(err) => Verdict::Failed(invoke_failure(case, err)),
        };
        info!(test = case.full_name(), passed = verdict.is_success(), "test finished");
        Ok(verdict)
    }

    /// Runs every case in order; setup errors abort the run.
    pub fn run_all<'a>(
        &self,
        cases: impl IntoIterator<Item = &'a TestCase>,
    ) -> Result<Vec<Verdict>, HarnessError> {
        cases.into_iter().map(|case| self.run(case)).collect()
    }
}

fn invoke_failure(case: &TestCase, err: InvokeError) -> TestFailure {
    let kind = match err {
        InvokeError::Timeout(_) => FailureKind::Timeout,
        InvokeError::Spawn { .. } | InvokeError::Wait(_) => FailureKind::Invocation,
    };
    TestFailure::new(kind, err.to_string(), case)
}

/// Pass/fail counts over a set of verdicts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub passed: usize,
    pub failed: usize,
}

impl Summary {
    pub fn from_verdicts<'a>(verdicts: impl IntoIterator<Item = &'a Verdict>) -> Self {
        verdicts
            .into_iter()
            .fold(Summary::default(), |mut summary, verdict| {
                if verdict.is_success() {
                    summary.passed += 1;
                } else {
                    summary.failed += 1;
                }
                summary
            })
    }

    pub fn total(&self) -> usize {
        self.passed + self.failed
    }

    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::FixtureEntry;
    use crate::process::ProcessResult;
    use crate::test_case::TestSuite;
    use crate::variant::TestKind;

    fn case() -> TestCase {
        let suite = TestSuite::new("build-pass", "/suites/build-pass", TestKind::BuildPass);
        TestCase::new("/suites/build-pass/a.cpp", FixtureEntry::default(), 1, &suite)
    }

    #[test]
    fn isolated_work_dir_uses_full_identity() {
        let runner = TestRunner::new(RunnerConfig {
            work_root: PathBuf::from("/work"),
            ..RunnerConfig::default()
        });
        assert_eq!(
            runner.work_dir(&case()),
            PathBuf::from("/work/build-pass/a_1")
        );
    }

    #[test]
    fn shared_work_dir_is_the_root() {
        let runner = TestRunner::new(RunnerConfig {
            work_root: PathBuf::from("/work"),
            isolate_artifacts: false,
            ..RunnerConfig::default()
        });
        assert_eq!(runner.work_dir(&case()), PathBuf::from("/work"));
    }

    #[test]
    fn timeout_is_its_own_failure_kind() {
        let failure = invoke_failure(
            &case(),
            InvokeError::Timeout(std::time::Duration::from_millis(250)),
        );
        assert_eq!(failure.kind, FailureKind::Timeout);
        assert_eq!(failure.message, "timed out after 250ms");
    }

    #[test]
    fn summary_counts_verdicts() {
        let case = case();
        let artifacts = case.artifacts_in(std::path::Path::new("/work"));
        let verdicts = vec![
            evaluator::evaluate(&case, &ProcessResult::new(0, "", ""), &artifacts),
            evaluator::evaluate(&case, &ProcessResult::new(1, "", "x"), &artifacts),
        ];
        let summary = Summary::from_verdicts(&verdicts);
        assert_eq!(summary, Summary { passed: 1, failed: 1 });
        assert_eq!(summary.total(), 2);
        assert!(!summary.all_passed());
    }
}
