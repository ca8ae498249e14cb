//! User-facing output for the CLI: per-test status lines, failure details,
//! colored ABI diffs and the run summary.

use std::io::Write;

use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::errors::TestFailure;
use crate::runner::Summary;
use crate::test_case::TestCase;

/// Colored writer over stdout.
pub struct Reporter {
    out: StandardStream,
}

impl Reporter {
    pub fn new(use_colors: bool) -> Self {
        let choice = if use_colors {
            ColorChoice::Auto
        } else {
            ColorChoice::Never
        };
        Self {
            out: StandardStream::stdout(choice),
        }
    }

    pub fn pass(&mut self, case: &TestCase) {
        self.status("PASS", Color::Green);
        let _ = writeln!(self.out, " {}", case.full_name());
    }

    pub fn fail(&mut self, failure: &TestFailure) {
        self.status("FAIL", Color::Red);
        let _ = writeln!(self.out, " {} [{}]", failure.test_name(), failure.kind);
        let _ = writeln!(self.out, "  {}", failure.message);
        if let Some(diff) = &failure.diff {
            let _ = writeln!(self.out, "  Diff:");
            self.diff(diff);
        }
    }

    pub fn plan(&mut self, case: &TestCase, command_line: &str) {
        self.status(case.full_name(), Color::Cyan);
        let _ = writeln!(self.out);
        let _ = writeln!(self.out, "  {}", command_line);
    }

    pub fn summary(&mut self, summary: &Summary) {
        let _ = writeln!(self.out);
        let _ = write!(self.out, "Test summary: total {}, ", summary.total());
        self.status("passed", Color::Green);
        let _ = write!(self.out, " {}, ", summary.passed);
        self.status("failed", Color::Red);
        let _ = writeln!(self.out, " {}", summary.failed);
    }

    fn status(&mut self, label: &str, color: Color) {
        let _ = self
            .out
            .set_color(ColorSpec::new().set_fg(Some(color)).set_bold(true));
        let _ = write!(self.out, "{}", label);
        let _ = self.out.reset();
    }

    fn diff(&mut self, diff: &str) {
        for line in diff.lines() {
            let color = match line.chars().next() {
                Some('+') => Some(Color::Green),
                Some('-') => Some(Color::Red),
                _ => None,
            };
            let _ = self.out.set_color(ColorSpec::new().set_fg(color));
            let _ = writeln!(self.out, "  {}", line);
        }
        let _ = self.out.reset();
    }
}
