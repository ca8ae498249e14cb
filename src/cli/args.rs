//! Command-line arguments for the toolchain tester.
//!
//! Uses the `clap` derive API.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::DEFAULT_COMPILER;
use crate::variant::TestKind;

/// The main CLI argument structure.
#[derive(Debug, Parser)]
#[command(
    name = "cdt-toolchain-tester",
    version,
    about = "Runs compiler fixtures and verifies exit codes, stderr, ABI and wasm output."
)]
pub struct TesterArgs {
    /// Echo compiler output and invocation details to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run every test case of the given fixture sources.
    Run {
        #[command(flatten)]
        suite: SuiteArgs,

        /// Seconds before a compiler invocation is killed; 0 waits forever.
        #[arg(long, default_value_t = 300)]
        timeout_secs: u64,

        /// Directory the compiler runs in.
        #[arg(long, default_value = ".")]
        work_dir: PathBuf,

        /// Run every case directly in the work directory instead of a
        /// per-case subdirectory.
        #[arg(long)]
        shared_artifacts: bool,
    },
    /// Print the compiler command line of every test case without running it.
    Plan {
        #[command(flatten)]
        suite: SuiteArgs,
    },
}

/// Where the compiler lives and which suite the fixtures belong to.
#[derive(Debug, Args)]
pub struct SuiteArgs {
    /// Directory containing the compiler binaries.
    #[arg(long)]
    pub cdt: PathBuf,

    /// Compiler binary name inside the CDT directory.
    #[arg(long, default_value = DEFAULT_COMPILER)]
    pub compiler: String,

    /// Suite directory; defaults to the directory of the first source.
    #[arg(long)]
    pub suite_dir: Option<PathBuf>,

    /// Test kind; defaults to the suite directory's name.
    #[arg(long, value_enum)]
    pub kind: Option<TestKind>,

    /// Fixture sources to run.
    #[arg(required = true)]
    pub sources: Vec<PathBuf>,
}
