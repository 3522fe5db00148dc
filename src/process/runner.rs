//! Subprocess execution with buffered output capture and cancellation.
//!
//! One call = one bounded operation: spawn the tool, wait for exit or
//! cancellation, return an [`ExecutionResult`]. There are no retries at this
//! layer; a tool that cannot be found or started is surfaced immediately as
//! an error, and everything else (non-zero exits included) comes back as
//! data.

use crate::error::{AdbrunError, Result};
use crate::locator::ToolPath;
use crate::process::args::ArgumentBuilder;
use crate::process::cancel::CancellationToken;
use std::io::Read;
use std::process::{Child, Command, Stdio};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Sentinel exit code reported when the process did not exit on its own:
/// killed by cancellation, or terminated by a signal. Real tool exit codes
/// are non-negative, so the sentinel never collides with one.
pub const CANCELLED_EXIT_CODE: i32 = -1;

/// How often the wait loop checks for exit or cancellation.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Outcome of a single tool invocation.
///
/// Created exactly once per invocation, after the subprocess has terminated
/// (naturally or by kill) and both output streams are fully captured. There
/// is no partial-result visibility while the process runs.
#[derive(Debug, Clone)]
pub struct ExecutionResult {
    /// Exit code of the process, or [`CANCELLED_EXIT_CODE`] if it was killed.
    pub exit_code: i32,
    /// Captured standard output.
    pub stdout: String,
    /// Captured standard error.
    pub stderr: String,
    /// True if the process was killed by cancellation before natural exit.
    pub cancelled: bool,
}

impl ExecutionResult {
    /// True when the process ran to completion and exited zero.
    pub fn success(&self) -> bool {
        !self.cancelled && self.exit_code == 0
    }
}

/// Owns the child for the duration of one invocation and guarantees it is
/// reaped on every exit path, including errors during output capture.
struct ChildGuard(Child);

impl ChildGuard {
    /// Forcefully terminate the child and reap it. Errors are ignored: the
    /// child may already have exited, which is fine.
    fn kill(&mut self) {
        let _ = self.0.kill();
        let _ = self.0.wait();
    }
}

impl Drop for ChildGuard {
    fn drop(&mut self) {
        self.kill();
    }
}

/// Run a resolved tool with the given arguments, blocking until it exits or
/// the cancellation token fires.
///
/// * A missing executable fails with [`AdbrunError::ToolNotFound`] before any
///   subprocess is spawned.
/// * An OS spawn refusal (permissions, corrupt binary) fails with
///   [`AdbrunError::SpawnFailure`] carrying the underlying error.
/// * Cancellation kills the process and returns a result with
///   `cancelled = true`, exit code [`CANCELLED_EXIT_CODE`], and whatever
///   output was captured up to that point. No orphan is left behind.
/// * A non-zero exit code is returned as data, never as an error.
pub fn run(
    tool: &ToolPath,
    builder: &ArgumentBuilder,
    token: &CancellationToken,
) -> Result<ExecutionResult> {
    // Re-check existence at execution time; resolution may race with deletion.
    if !tool.path.is_file() {
        return Err(AdbrunError::ToolNotFound {
            tool: tool.tool.name().to_string(),
        });
    }

    let mut command = Command::new(&tool.path);
    command
        .args(builder.render())
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    if let Some(dir) = builder.working_dir() {
        command.current_dir(dir);
    }
    for (key, value) in builder.env() {
        command.env(key, value);
    }

    let child = command.spawn().map_err(|source| AdbrunError::SpawnFailure {
        tool: tool.tool.name().to_string(),
        source,
    })?;
    let mut guard = ChildGuard(child);

    // Drain both pipes on dedicated threads so the child never blocks on a
    // full pipe buffer while we poll for exit.
    let stdout_capture = guard.0.stdout.take().map(capture);
    let stderr_capture = guard.0.stderr.take().map(capture);

    let (exit_code, cancelled) = loop {
        if token.is_cancelled() {
            guard.kill();
            break (CANCELLED_EXIT_CODE, true);
        }

        match guard.0.try_wait() {
            Ok(Some(status)) => break (status.code().unwrap_or(CANCELLED_EXIT_CODE), false),
            Ok(None) => thread::sleep(POLL_INTERVAL),
            Err(source) => {
                // Guard drop reaps the child.
                return Err(AdbrunError::SpawnFailure {
                    tool: tool.tool.name().to_string(),
                    source,
                });
            }
        }
    };

    // The child has exited (or been killed), so both pipes are at EOF and
    // the capture threads finish promptly.
    let stdout = join_capture(stdout_capture);
    let stderr = join_capture(stderr_capture);

    Ok(ExecutionResult {
        exit_code,
        stdout,
        stderr,
        cancelled,
    })
}

/// Read a pipe to EOF on a background thread, tolerating non-UTF-8 bytes.
fn capture<R: Read + Send + 'static>(mut reader: R) -> JoinHandle<String> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        let _ = reader.read_to_end(&mut buf);
        String::from_utf8_lossy(&buf).into_owned()
    })
}

fn join_capture(handle: Option<JoinHandle<String>>) -> String {
    handle
        .and_then(|h| h.join().ok())
        .unwrap_or_default()
}
