//! External compiler invocation.
//!
//! One test case maps to exactly one synchronous invocation. The wait is
//! bounded: a compiler that outlives its deadline is killed and reported as
//! [`InvokeError::Timeout`]. The same deadline covers reading its output, so
//! a background child still holding the pipes cannot stall the run.

use std::io::{self, Read};
use std::path::Path;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::{debug, info};

use crate::test_case::InvocationSpec;

const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Exit code and captured output of a finished compiler run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessResult {
    /// Exit code; `-N` when killed by signal `N`, `-1` when unknown.
    pub code: i32,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

impl ProcessResult {
    pub fn new(code: i32, stdout: impl Into<Vec<u8>>, stderr: impl Into<Vec<u8>>) -> Self {
        Self {
            code,
            stdout: stdout.into(),
            stderr: stderr.into(),
        }
    }

    pub fn stdout_text(&self) -> String {
        String::from_utf8_lossy(&self.stdout).into_owned()
    }

    pub fn stderr_text(&self) -> String {
        String::from_utf8_lossy(&self.stderr).into_owned()
    }
}

#[derive(Debug, Error)]
pub enum InvokeError {
    #[error("failed to spawn {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
    #[error("failed while waiting for the compiler: {0}")]
    Wait(#[source] io::Error),
    #[error("timed out after {}ms", .0.as_millis())]
    Timeout(Duration),
}

/// Runs the invocation in `cwd` and captures its result.
///
/// With `timeout` set to `None` the wait is unbounded.
pub fn invoke(
    spec: &InvocationSpec,
    cwd: &Path,
    timeout: Option<Duration>,
) -> Result<ProcessResult, InvokeError> {
    info!(command = %spec.command_line(), cwd = %cwd.display(), "invoking compiler");

    let mut child = Command::new(&spec.program)
        .args(&spec.args)
        .current_dir(cwd)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|source| InvokeError::Spawn {
            program: spec.program.display().to_string(),
            source,
        })?;

    let deadline = timeout.map(|bound| Deadline {
        at: Instant::now() + bound,
        bound,
    });
    let stdout = drain(child.stdout.take());
    let stderr = drain(child.stderr.take());

    let status = match wait(&mut child, deadline) {
        Ok(status) => status,
        Err(err) => {
            let _ = child.kill();
            let _ = child.wait();
            return Err(err);
        }
    };

    let result = ProcessResult {
        code: exit_code(status),
        stdout: collect(stdout, deadline)?,
        stderr: collect(stderr, deadline)?,
    };
    debug!(code = result.code, "compiler exited");
    Ok(result)
}

#[derive(Debug, Clone, Copy)]
struct Deadline {
    at: Instant,
    bound: Duration,
}

impl Deadline {
    fn remaining(&self) -> Duration {
        self.at.saturating_duration_since(Instant::now())
    }

    fn expired(&self) -> InvokeError {
        InvokeError::Timeout(self.bound)
    }
}

fn wait(child: &mut Child, deadline: Option<Deadline>) -> Result<ExitStatus, InvokeError> {
    let Some(deadline) = deadline else {
        return child.wait().map_err(InvokeError::Wait);
    };
    loop {
        if let Some(status) = child.try_wait().map_err(InvokeError::Wait)? {
            return Ok(status);
        }
        if Instant::now() >= deadline.at {
            return Err(deadline.expired());
        }
        thread::sleep(POLL_INTERVAL);
    }
}

// Pipes are drained on their own threads so a chatty compiler cannot block
// on a full pipe while we wait for it.
fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> Option<Receiver<Vec<u8>>> {
    pipe.map(|mut pipe| {
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let mut buf = Vec::new();
            let _ = pipe.read_to_end(&mut buf);
            let _ = tx.send(buf);
        });
        rx
    })
}

// A reader still blocked at the deadline is abandoned; it exits once the
// last writer closes the pipe.
fn collect(
    output: Option<Receiver<Vec<u8>>>,
    deadline: Option<Deadline>,
) -> Result<Vec<u8>, InvokeError> {
    let Some(output) = output else {
        return Ok(Vec::new());
    };
    let Some(deadline) = deadline else {
        return Ok(output.recv().unwrap_or_default());
    };
    match output.recv_timeout(deadline.remaining()) {
        Ok(buf) => Ok(buf),
        Err(RecvTimeoutError::Timeout) => Err(deadline.expired()),
        Err(RecvTimeoutError::Disconnected) => Ok(Vec::new()),
    }
}

#[cfg(unix)]
fn exit_code(status: ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;
    status
        .code()
        .or_else(|| status.signal().map(|sig| -sig))
        .unwrap_or(-1)
}

#[cfg(not(unix))]
fn exit_code(status: ExitStatus) -> i32 {
    status.code().unwrap_or(-1)
}
