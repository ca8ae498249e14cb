//! The toolchain tester command-line interface.
//!
//! Resolves the suite and its test cases from the command line, runs them
//! through [`TestRunner`] and reports the verdicts.

use std::path::{Path, PathBuf};
use std::process;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::args::{Command, SuiteArgs, TesterArgs};
use crate::cli::output::Reporter;
use crate::config::RunnerConfig;
use crate::errors::HarnessError;
use crate::evaluator::Verdict;
use crate::runner::{Summary, TestRunner};
use crate::test_case::{TestCase, TestSuite};

pub mod args;
pub mod output;

/// The main entry point for the CLI.
pub fn run() {
    let args = TesterArgs::parse();
    install_subscriber(args.verbose);

    let result = match args.command {
        Command::Run {
            suite,
            timeout_secs,
            work_dir,
            shared_artifacts,
        } => {
            let config = RunnerConfig {
                cdt_path: suite.cdt.clone(),
                compiler: suite.compiler.clone(),
                timeout: (timeout_secs > 0).then(|| Duration::from_secs(timeout_secs)),
                work_root: work_dir,
                isolate_artifacts: !shared_artifacts,
                ..RunnerConfig::default()
            };
            handle_run(&suite, config)
        }
        Command::Plan { suite } => handle_plan(&suite),
    };

    match result {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            eprintln!("{:?}", miette::Report::new(e));
            process::exit(2);
        }
    }
}

fn install_subscriber(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Runs all cases; `Ok(false)` when any of them failed.
fn handle_run(args: &SuiteArgs, config: RunnerConfig) -> Result<bool, HarnessError> {
    let cases = resolve_cases(args)?;
    let mut reporter = Reporter::new(config.use_colors);
    let runner = TestRunner::new(config);

    let mut verdicts = Vec::with_capacity(cases.len());
    for case in &cases {
        let verdict = runner.run(case)?;
        match &verdict {
            Verdict::Passed => reporter.pass(case),
            Verdict::Failed(failure) => reporter.fail(failure),
        }
        verdicts.push(verdict);
    }

    let summary = Summary::from_verdicts(&verdicts);
    reporter.summary(&summary);
    Ok(summary.all_passed())
}

fn handle_plan(args: &SuiteArgs) -> Result<bool, HarnessError> {
    let cases = resolve_cases(args)?;
    let compiler = args.cdt.join(&args.compiler);
    let mut reporter = Reporter::new(RunnerConfig::default().use_colors);
    for case in &cases {
        reporter.plan(case, &case.invocation(&compiler).command_line());
    }
    Ok(true)
}

fn resolve_cases(args: &SuiteArgs) -> Result<Vec<TestCase>, HarnessError> {
    let suite = resolve_suite(args)?;
    let mut cases = Vec::new();
    for source in &args.sources {
        cases.extend(suite.test_cases(source)?);
    }
    Ok(cases)
}

fn resolve_suite(args: &SuiteArgs) -> Result<TestSuite, HarnessError> {
    let directory = args.suite_dir.clone().unwrap_or_else(|| {
        args.sources
            .first()
            .and_then(|s| s.parent())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."))
    });
    match args.kind {
        Some(kind) => {
            let name = directory
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| kind.as_str().to_string());
            Ok(TestSuite::new(name, directory, kind))
        }
        None => TestSuite::from_directory(directory),
    }
}
