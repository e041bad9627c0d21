// Subprocess runner implementation
// reason: async-trait, tokio for async process management
use async_trait::async_trait;
use std::process::{ExitStatus, Stdio};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::{Child, Command};
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use netprobe_core::port::process_runner::{
    ExecutionOutcome, ProcessError, ProcessInvocation, ProcessRunner,
};

/// How long pipe readers may keep draining once the process is gone
const PIPE_DRAIN_GRACE: Duration = Duration::from_millis(500);

/// How long to wait for a killed process to be reaped
const KILL_REAP_TIMEOUT: Duration = Duration::from_secs(2);

const READ_CHUNK_SIZE: usize = 8 * 1024;

/// Subprocess runner
///
/// Spawns one child per invocation with stdout/stderr piped into separate
/// buffers. When the deadline passes the child is killed (on Unix its whole
/// process group, so `sh -c` children go too) and whatever was already read
/// from the pipes is returned with a `TimedOut` error. A process that exits
/// normally but leaves background processes holding its pipes gets its group
/// killed once the drain grace runs out.
#[derive(Debug, Clone, Default)]
pub struct SubprocessRunner;

impl SubprocessRunner {
    pub fn new() -> Self {
        Self
    }

    fn build_command(invocation: &ProcessInvocation) -> Command {
        let mut command = Command::new(&invocation.program);
        command
            .args(&invocation.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        #[cfg(unix)]
        {
            // New process group, so a timeout kill reaches the whole tree
            command.process_group(0);
        }

        command
    }

    /// Wait for exit, killing the child if the deadline passes first
    async fn wait_with_deadline(
        child: &mut Child,
        group: Option<u32>,
        deadline: Duration,
    ) -> Option<ProcessError> {
        match timeout(deadline, child.wait()).await {
            Ok(Ok(status)) => exit_error(status),
            Ok(Err(e)) => Some(ProcessError::Io(e.to_string())),
            Err(_) => {
                warn!(
                    pid = ?child.id(),
                    deadline = ?deadline,
                    "Subprocess exceeded its deadline, killing"
                );
                Self::terminate(child, group).await;
                Some(ProcessError::TimedOut { deadline })
            }
        }
    }

    /// Force-kill the child (and its process group on Unix), then reap it
    async fn terminate(child: &mut Child, group: Option<u32>) {
        kill_group(group);

        if let Err(e) = child.start_kill() {
            debug!(error = %e, "start_kill failed (process may already be gone)");
        }

        if timeout(KILL_REAP_TIMEOUT, child.wait()).await.is_err() {
            warn!("Killed subprocess was not reaped in time");
        }
    }
}

/// SIGKILL every process in the child's group
///
/// `group` is the child's pid captured at spawn: once the child is reaped
/// `Child::id` returns `None`, but backgrounded grandchildren keep the group
/// alive. A no-op off Unix.
fn kill_group(group: Option<u32>) {
    #[cfg(unix)]
    {
        use nix::sys::signal::{killpg, Signal};
        use nix::unistd::Pid;

        if let Some(pgid) = group.and_then(|pid| i32::try_from(pid).ok()) {
            if let Err(e) = killpg(Pid::from_raw(pgid), Signal::SIGKILL) {
                debug!(pgid = %pgid, error = %e, "killpg failed (group may already be gone)");
            }
        }
    }

    #[cfg(not(unix))]
    let _ = group;
}

fn exit_error(status: ExitStatus) -> Option<ProcessError> {
    if status.success() {
        None
    } else {
        Some(ProcessError::NonZeroExit {
            code: status.code(),
        })
    }
}

/// Buffer filled by a background reader
///
/// The buffer lives outside the reader task, so bytes read before an abort
/// are still available.
struct PipeCapture {
    buffer: Arc<Mutex<Vec<u8>>>,
    task: JoinHandle<()>,
}

impl PipeCapture {
    fn spawn<R>(pipe: Option<R>) -> Self
    where
        R: AsyncRead + Unpin + Send + 'static,
    {
        let buffer = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&buffer);

        let task = tokio::spawn(async move {
            let Some(mut pipe) = pipe else {
                return;
            };
            let mut chunk = vec![0u8; READ_CHUNK_SIZE];
            loop {
                match pipe.read(&mut chunk).await {
                    Ok(0) => break,
                    Ok(n) => {
                        if let Ok(mut buffer) = sink.lock() {
                            buffer.extend_from_slice(&chunk[..n]);
                        }
                    }
                    Err(e) => {
                        debug!(error = %e, "Pipe read failed");
                        break;
                    }
                }
            }
        });

        Self { buffer, task }
    }

    /// Wait briefly for EOF, then take what has been captured
    ///
    /// The flag is false when the pipe was still open after the grace period,
    /// meaning some other process holds its write end.
    async fn finish(self) -> (String, bool) {
        let PipeCapture { buffer, mut task } = self;

        let closed = timeout(PIPE_DRAIN_GRACE, &mut task).await.is_ok();
        if !closed {
            task.abort();
        }

        let bytes = buffer
            .lock()
            .map(|mut captured| std::mem::take(&mut *captured))
            .unwrap_or_default();
        (String::from_utf8_lossy(&bytes).into_owned(), closed)
    }
}

#[async_trait]
impl ProcessRunner for SubprocessRunner {
    async fn run(&self, invocation: &ProcessInvocation) -> ExecutionOutcome {
        let started = Instant::now();

        info!(
            program = %invocation.program,
            args = ?invocation.args,
            deadline = ?invocation.deadline,
            "Starting subprocess execution"
        );

        let mut child = match Self::build_command(invocation).spawn() {
            Ok(child) => child,
            Err(e) => {
                warn!(program = %invocation.program, error = %e, "Subprocess spawn failed");
                return ExecutionOutcome::failure(
                    "",
                    "",
                    ProcessError::SpawnFailed {
                        program: invocation.program.clone(),
                        reason: e.to_string(),
                    },
                );
            }
        };

        // Leader of its own process group on Unix, so its pid is the pgid
        let group = child.id();
        let stdout = PipeCapture::spawn(child.stdout.take());
        let stderr = PipeCapture::spawn(child.stderr.take());

        let error = Self::wait_with_deadline(&mut child, group, invocation.deadline).await;

        let (stdout, stdout_closed) = stdout.finish().await;
        let (stderr, stderr_closed) = stderr.finish().await;
        if !(stdout_closed && stderr_closed) {
            warn!(
                program = %invocation.program,
                pgid = ?group,
                "Output pipes still open after exit, killing leftover processes"
            );
            kill_group(group);
        }

        let outcome = ExecutionOutcome {
            stdout,
            stderr,
            error,
        };

        info!(
            program = %invocation.program,
            duration_ms = %started.elapsed().as_millis(),
            stdout_bytes = outcome.stdout.len(),
            stderr_bytes = outcome.stderr.len(),
            error = ?outcome.error,
            "Subprocess execution completed"
        );

        outcome
    }
}
