//! # Toolchain Tester Test Support
//!
//! A fake compiler and fixture builders shared by the integration tests.
//!
//! The fake compiler is a `sh` script that mimics the real compiler's command
//! line: an optional leading `-c`, the source path, then flags. It sets
//! `mode` (`build` or `compile`), `src` and `base`, then sources the fixture
//! itself, so each fixture is a small shell program describing how the
//! compiler should behave for it. Remaining flags are left in `$@`.
#![allow(dead_code)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::time::Duration;

use cdt_toolchain_tester::{RunnerConfig, TestKind, TestRunner, TestSuite};
use tempfile::TempDir;

pub const FAKE_COMPILER: &str = "fake-codegen";

const FAKE_COMPILER_SCRIPT: &str = r#"#!/bin/sh
mode=build
if [ "$1" = "-c" ]; then
    mode=compile
    shift
fi
src="$1"
shift
base=$(basename "$src")
base="${base%%.*}"
. "$src"
"#;

static FAKE_CDT: OnceLock<TempDir> = OnceLock::new();

/// Directory holding the fake compiler; created once per test binary.
pub fn fake_cdt() -> &'static Path {
    FAKE_CDT
        .get_or_init(|| {
            let dir = tempfile::tempdir().expect("create fake cdt dir");
            let path = dir.path().join(FAKE_COMPILER);
            fs::write(&path, FAKE_COMPILER_SCRIPT).expect("write fake compiler");
            let mut perms = fs::metadata(&path).expect("stat fake compiler").permissions();
            perms.set_mode(0o755);
            fs::set_permissions(&path, perms).expect("chmod fake compiler");
            dir
        })
        .path()
}

/// A suite directory named after its kind inside a fresh temp dir.
pub struct SuiteFixture {
    _root: TempDir,
    pub suite: TestSuite,
}

impl SuiteFixture {
    pub fn new(kind: TestKind) -> Self {
        let root = tempfile::tempdir().expect("create suite root");
        let dir = root.path().join(kind.as_str());
        fs::create_dir_all(&dir).expect("create suite dir");
        let suite = TestSuite::from_directory(&dir).expect("suite dir named after kind");
        Self { _root: root, suite }
    }

    pub fn dir(&self) -> &Path {
        &self.suite.directory
    }

    /// Writes a fixture source (a shell body run by the fake compiler) and,
    /// when given, its `.json` metadata.
    pub fn fixture(&self, file_name: &str, script: &str, metadata: Option<&str>) -> PathBuf {
        let source = self.dir().join(file_name);
        fs::write(&source, script).expect("write fixture source");
        if let Some(metadata) = metadata {
            fs::write(source.with_extension("json"), metadata).expect("write fixture metadata");
        }
        source
    }

    /// Writes an auxiliary file (expected ABI, proto files) into the suite.
    pub fn file(&self, relative: &str, contents: &str) -> PathBuf {
        let path = self.dir().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create parent dir");
        }
        fs::write(&path, contents).expect("write suite file");
        path
    }
}

pub fn config(work_root: &Path) -> RunnerConfig {
    RunnerConfig {
        cdt_path: fake_cdt().to_path_buf(),
        compiler: FAKE_COMPILER.to_string(),
        timeout: Some(Duration::from_secs(30)),
        work_root: work_root.to_path_buf(),
        isolate_artifacts: true,
        use_colors: false,
    }
}

pub fn runner(work_root: &Path) -> TestRunner {
    TestRunner::new(config(work_root))
}
