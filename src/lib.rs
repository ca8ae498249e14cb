//! Conformance test runner for the CDT contract compiler toolchain.
//!
//! A test case is a fixture source plus an entry of its metadata. The runner
//! invokes the compiler once per case and the evaluator decides the verdict:
//! the declared outcome of the case's variant first, then the optional
//! expectation checks (exit code, stderr, canonical ABI, wasm hex).
//!
//! ```rust,no_run
//! use cdt_toolchain_tester::{RunnerConfig, TestRunner, TestSuite};
//!
//! let suite = TestSuite::from_directory("tests/toolchain/abigen-pass")?;
//! let runner = TestRunner::new(RunnerConfig::default());
//! for case in suite.test_cases("tests/toolchain/abigen-pass/hello.cpp")? {
//!     if let Err(failure) = runner.run(&case)?.into_result() {
//!         eprintln!("{}: {}", failure.test_name(), failure);
//!     }
//! }
//! # Ok::<(), cdt_toolchain_tester::HarnessError>(())
//! ```

pub mod canonical;
pub mod cli;
pub mod config;
pub mod errors;
pub mod evaluator;
pub mod expectation;
pub mod fixture;
pub mod process;
pub mod runner;
pub mod test_case;
pub mod variant;

pub use config::RunnerConfig;
pub use errors::{FailureKind, HarnessError, TestFailure};
pub use evaluator::{evaluate, Verdict};
pub use expectation::Expectation;
pub use process::ProcessResult;
pub use runner::{Summary, TestRunner};
pub use test_case::{InvocationSpec, TestCase, TestSuite};
pub use variant::TestKind;
