//! External command executor
//!
//! Runs one source control command line synchronously, captures its output
//! and classifies the outcome (timeout, failure, success with warnings).

use std::io::{self, Read, Write};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use super::VcsError;
use super::constants::process::{POLL_INTERVAL_MS, UNKNOWN_EXIT_CODE};
use super::process::{ProcessInfo, ProcessResult};

/// Anything that can run a [`ProcessInfo`] to completion.
///
/// Providers depend on this rather than on [`ProcessExecutor`] so tests can
/// script command output without spawning processes.
pub trait ProcessRunner: Send + Sync {
    fn execute(&self, info: &ProcessInfo) -> Result<ProcessResult, VcsError>;
}

/// Executor for external commands
#[derive(Debug, Clone)]
pub struct ProcessExecutor {
    poll_interval: Duration,
}

impl Default for ProcessExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessRunner for ProcessExecutor {
    fn execute(&self, info: &ProcessInfo) -> Result<ProcessResult, VcsError> {
        ProcessExecutor::execute(self, info)
    }
}

impl ProcessExecutor {
    pub fn new() -> Self {
        Self {
            poll_interval: Duration::from_millis(POLL_INTERVAL_MS),
        }
    }

    /// Run `info` and classify the outcome.
    ///
    /// - timed out: `VcsError::Timeout`
    /// - unsuccessful exit code: `VcsError::ExternalToolFailure`, unless
    ///   stderr matches one of the ignorable patterns
    /// - successful exit with stderr output: logged as a warning, `Ok`
    pub fn execute(&self, info: &ProcessInfo) -> Result<ProcessResult, VcsError> {
        let result = self.run(info)?;

        if result.timed_out {
            return Err(VcsError::Timeout {
                command: info.public_command_line(),
                timeout: info.timeout(),
            });
        }

        if !info.is_successful(result.exit_code) {
            if info.is_ignorable_stderr(&result.standard_error) {
                debug!(
                    command = %info.public_command_line(),
                    exit_code = result.exit_code,
                    "ignoring failure, stderr matches an ignorable pattern"
                );
                return Ok(result);
            }
            return Err(VcsError::ExternalToolFailure {
                command: info.full_command_line(),
                exit_code: result.exit_code,
                stderr: result.standard_error,
            });
        }

        if result.has_error_output() {
            warn!(
                command = %info.public_command_line(),
                stderr = %result.standard_error.trim(),
                "process succeeded but wrote to standard error"
            );
        }

        Ok(result)
    }

    /// Run `info` and capture its output without interpreting the exit code.
    ///
    /// The timeout covers the child and the pipes it hands down: a process
    /// that outlives it is killed, and output still held open by a
    /// grandchild past the deadline is abandoned. Either way `timed_out` is
    /// set and the captured output is empty. The child is killed and reaped
    /// before this returns.
    pub fn run(&self, info: &ProcessInfo) -> Result<ProcessResult, VcsError> {
        let mut cmd = Command::new(info.executable());
        cmd.args(info.arguments().values())
            .envs(info.environment())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .stdin(if info.standard_input().is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            });

        if let Some(dir) = info.working_directory() {
            cmd.current_dir(dir);
        }

        debug!(
            command = %info.public_command_line(),
            working_directory = ?info.working_directory(),
            "starting process"
        );

        let child = cmd.spawn().map_err(|e| {
            if e.kind() == io::ErrorKind::NotFound {
                VcsError::ExecutableNotFound(info.executable().display().to_string())
            } else {
                VcsError::IoError(e)
            }
        })?;
        // `None` when the timeout is too large to represent: wait forever
        let deadline = Instant::now().checked_add(info.timeout());

        let mut child = scopeguard::guard(child, |mut child| {
            if let Ok(None) = child.try_wait() {
                let _ = child.kill();
                let _ = child.wait();
            }
        });

        let stdin_writer = info
            .standard_input()
            .zip(child.stdin.take())
            .map(|(input, mut pipe)| {
                let input = input.to_string();
                spawn_worker(move || pipe.write_all(input.as_bytes()))
            });
        let stdout_reader = spawn_reader(child.stdout.take());
        let stderr_reader = spawn_reader(child.stderr.take());

        let Some(status) = self.wait_with_deadline(&mut child, deadline)? else {
            warn!(
                command = %info.public_command_line(),
                pid = child.id(),
                timeout_ms = info.timeout().as_millis() as u64,
                "process timed out and will be killed"
            );
            let _ = child.kill();
            let _ = child.wait();
            // Readers may still be blocked on pipes held by grandchildren.
            return Ok(timed_out());
        };

        let written = receive(stdin_writer, deadline)?;
        let stdout = receive(stdout_reader, deadline)?;
        let stderr = receive(stderr_reader, deadline)?;
        let (Some(written), Some(stdout), Some(stderr)) = (written, stdout, stderr) else {
            warn!(
                command = %info.public_command_line(),
                timeout_ms = info.timeout().as_millis() as u64,
                "process exited but its pipes are still open at the timeout, abandoning output"
            );
            return Ok(timed_out());
        };

        if let Err(e) = written {
            debug!(error = %e, "child closed standard input early");
        }

        Ok(ProcessResult {
            standard_output: stdout.map_err(VcsError::IoError)?,
            standard_error: stderr.map_err(VcsError::IoError)?,
            exit_code: status.code().unwrap_or(UNKNOWN_EXIT_CODE),
            timed_out: false,
        })
    }

    /// Poll `child` until it exits or `deadline` passes (`None`)
    fn wait_with_deadline(
        &self,
        child: &mut Child,
        deadline: Option<Instant>,
    ) -> Result<Option<ExitStatus>, VcsError> {
        loop {
            if let Some(status) = child.try_wait()? {
                return Ok(Some(status));
            }
            if deadline.is_some_and(|deadline| Instant::now() >= deadline) {
                return Ok(None);
            }
            thread::sleep(self.poll_interval);
        }
    }
}

fn timed_out() -> ProcessResult {
    ProcessResult {
        timed_out: true,
        exit_code: UNKNOWN_EXIT_CODE,
        ..Default::default()
    }
}

/// Run `work` on its own thread, handing its result back over a channel
fn spawn_worker<T, F>(work: F) -> Receiver<io::Result<T>>
where
    T: Send + 'static,
    F: FnOnce() -> io::Result<T> + Send + 'static,
{
    let (sender, receiver) = mpsc::channel();
    thread::spawn(move || {
        // The receiver is gone once the output was abandoned
        let _ = sender.send(work());
    });
    receiver
}

/// Drain a pipe on its own thread so a chatty child never blocks on a full pipe
fn spawn_reader<R>(source: Option<R>) -> Option<Receiver<io::Result<String>>>
where
    R: Read + Send + 'static,
{
    source.map(|mut source| {
        spawn_worker(move || {
            let mut buf = Vec::new();
            source.read_to_end(&mut buf)?;
            Ok(String::from_utf8_lossy(&buf).into_owned())
        })
    })
}

/// Wait for a worker until `deadline`; `Ok(None)` once the deadline passes
fn receive<T: Default>(
    worker: Option<Receiver<io::Result<T>>>,
    deadline: Option<Instant>,
) -> Result<Option<io::Result<T>>, VcsError> {
    let Some(receiver) = worker else {
        return Ok(Some(Ok(T::default())));
    };
    let received = match deadline {
        Some(deadline) => {
            receiver.recv_timeout(deadline.saturating_duration_since(Instant::now()))
        }
        None => receiver.recv().map_err(|_| RecvTimeoutError::Disconnected),
    };
    match received {
        Ok(result) => Ok(Some(result)),
        Err(RecvTimeoutError::Timeout) => Ok(None),
        Err(RecvTimeoutError::Disconnected) => Err(VcsError::IoError(io::Error::other(
            "process I/O thread panicked",
        ))),
    }
}
