// Process Runner Port
// Abstraction over "run this program with these args under a deadline"

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// One subprocess to run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessInvocation {
    pub program: String,
    pub args: Vec<String>,
    /// Hard upper bound; the process is killed once it is exceeded
    pub deadline: Duration,
}

impl ProcessInvocation {
    pub fn new(program: impl Into<String>, args: Vec<String>, deadline: Duration) -> Self {
        Self {
            program: program.into(),
            args,
            deadline,
        }
    }
}

/// Why a subprocess run failed
///
/// A timeout and a non-zero exit are both failures, but are kept apart so logs
/// can tell a killed process from one that gave up on its own.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProcessError {
    #[error("failed to start {program}: {reason}")]
    SpawnFailed { program: String, reason: String },

    #[error("{}", exit_description(.code))]
    NonZeroExit { code: Option<i32> },

    #[error("deadline of {deadline:?} exceeded, process killed")]
    TimedOut { deadline: Duration },

    #[error("IO error: {0}")]
    Io(String),
}

fn exit_description(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit status {}", code),
        None => "terminated by signal".to_string(),
    }
}

/// Raw result of a single subprocess run, before normalization
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutionOutcome {
    pub stdout: String,
    pub stderr: String,
    pub error: Option<ProcessError>,
}

impl ExecutionOutcome {
    pub fn success(stdout: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self {
            stdout: stdout.into(),
            stderr: stderr.into(),
            error: None,
        }
    }

    pub fn failure(
        stdout: impl Into<String>,
        stderr: impl Into<String>,
        error: ProcessError,
    ) -> Self {
        Self {
            stdout: stdout.into(),
            stderr: stderr.into(),
            error: Some(error),
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Process Runner trait
///
/// Implementations:
/// - SubprocessRunner: spawns a real OS process (infra-system)
/// - MockProcessRunner: scripted outcomes for tests
///
/// Failures never escape as `Err`: whatever was captured is returned together
/// with the error, so callers can always show partial output.
#[async_trait]
pub trait ProcessRunner: Send + Sync {
    /// Run the invocation to completion or until its deadline
    async fn run(&self, invocation: &ProcessInvocation) -> ExecutionOutcome;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Mock runner behavior
    #[derive(Debug, Clone)]
    pub enum MockBehavior {
        /// Exit zero with the given output
        Succeed { stdout: String, stderr: String },
        /// Fail with the given output and error
        Fail {
            stdout: String,
            stderr: String,
            error: ProcessError,
        },
        /// Block until the invocation's deadline, then report a timeout
        Hang,
    }

    /// Mock Process Runner that records every invocation
    pub struct MockProcessRunner {
        behavior: MockBehavior,
        invocations: Arc<Mutex<Vec<ProcessInvocation>>>,
    }

    impl MockProcessRunner {
        pub fn new(behavior: MockBehavior) -> Self {
            Self {
                behavior,
                invocations: Arc::new(Mutex::new(Vec::new())),
            }
        }

        pub fn new_success(stdout: impl Into<String>) -> Self {
            Self::new(MockBehavior::Succeed {
                stdout: stdout.into(),
                stderr: String::new(),
            })
        }

        /// Non-zero exit that still produced output
        pub fn new_nonzero_exit(stdout: impl Into<String>, code: i32) -> Self {
            Self::new(MockBehavior::Fail {
                stdout: stdout.into(),
                stderr: String::new(),
                error: ProcessError::NonZeroExit { code: Some(code) },
            })
        }

        pub fn new_hanging() -> Self {
            Self::new(MockBehavior::Hang)
        }

        pub fn invocations(&self) -> Vec<ProcessInvocation> {
            self.invocations.lock().unwrap().clone()
        }

        pub fn call_count(&self) -> usize {
            self.invocations.lock().unwrap().len()
        }

        /// Last invocation, if any
        pub fn last_invocation(&self) -> Option<ProcessInvocation> {
            self.invocations.lock().unwrap().last().cloned()
        }
    }

    #[async_trait]
    impl ProcessRunner for MockProcessRunner {
        async fn run(&self, invocation: &ProcessInvocation) -> ExecutionOutcome {
            self.invocations.lock().unwrap().push(invocation.clone());

            match &self.behavior {
                MockBehavior::Succeed { stdout, stderr } => {
                    ExecutionOutcome::success(stdout.clone(), stderr.clone())
                }
                MockBehavior::Fail {
                    stdout,
                    stderr,
                    error,
                } => ExecutionOutcome::failure(stdout.clone(), stderr.clone(), error.clone()),
                MockBehavior::Hang => {
                    tokio::time::sleep(invocation.deadline).await;
                    ExecutionOutcome::failure(
                        "",
                        "",
                        ProcessError::TimedOut {
                            deadline: invocation.deadline,
                        },
                    )
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            ProcessError::NonZeroExit { code: Some(1) }.to_string(),
            "exit status 1"
        );
        assert_eq!(
            ProcessError::NonZeroExit { code: None }.to_string(),
            "terminated by signal"
        );
        assert_eq!(
            ProcessError::TimedOut {
                deadline: Duration::from_millis(250)
            }
            .to_string(),
            "deadline of 250ms exceeded, process killed"
        );
        assert_eq!(
            ProcessError::SpawnFailed {
                program: "tracert".to_string(),
                reason: "No such file or directory".to_string()
            }
            .to_string(),
            "failed to start tracert: No such file or directory"
        );
    }
}
