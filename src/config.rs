//! Runner configuration.

use std::path::PathBuf;
use std::time::Duration;

/// Default compiler binary looked up inside `cdt_path`.
pub const DEFAULT_COMPILER: &str = "eosio-codegen";

/// Default bound on a single compiler invocation.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

/// Configuration for running test cases.
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Directory holding the compiler binaries.
    pub cdt_path: PathBuf,
    /// Compiler binary name inside `cdt_path`.
    pub compiler: String,
    /// Bound on each invocation; `None` waits forever.
    pub timeout: Option<Duration>,
    /// Directory the compiler runs in (or under, when isolating).
    pub work_root: PathBuf,
    /// Run each case in `<work_root>/<suite>/<name>` so artifacts of fixtures
    /// sharing a base name cannot collide.
    pub isolate_artifacts: bool,
    /// Color the report; defaults to whether stdout is a terminal.
    pub use_colors: bool,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            cdt_path: PathBuf::from("."),
            compiler: DEFAULT_COMPILER.to_string(),
            timeout: Some(DEFAULT_TIMEOUT),
            work_root: PathBuf::from("."),
            isolate_artifacts: true,
            use_colors: atty::is(atty::Stream::Stdout),
        }
    }
}

impl RunnerConfig {
    pub fn compiler_path(&self) -> PathBuf {
        self.cdt_path.join(&self.compiler)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compiler_lives_in_cdt_path() {
        let config = RunnerConfig {
            cdt_path: PathBuf::from("/opt/cdt/bin"),
            ..RunnerConfig::default()
        };
        assert_eq!(
            config.compiler_path(),
            PathBuf::from("/opt/cdt/bin/eosio-codegen")
        );
        assert_eq!(config.timeout, Some(DEFAULT_TIMEOUT));
        assert!(config.isolate_artifacts);
    }
}
