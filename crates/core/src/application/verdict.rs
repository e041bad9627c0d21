// Outcome normalization: raw subprocess outcome -> success/failure verdict

use crate::application::capability::ExitPolicy;
use crate::application::constants::STDERR_MARKER;
use crate::error::DiagnosticError;
use crate::port::ExecutionOutcome;
use tracing::debug;

/// Folded view of one diagnostic
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub succeeded: bool,
    pub output: String,
    pub error: Option<DiagnosticError>,
}

impl Verdict {
    /// Judge a subprocess outcome under the kind's exit policy
    ///
    /// Output is kept on every path, including failures.
    pub fn from_outcome(
        outcome: ExecutionOutcome,
        policy: ExitPolicy,
        error_context: &'static str,
    ) -> Self {
        let output = merge_output(&outcome.stdout, &outcome.stderr);

        match (outcome.error, policy) {
            (None, _) => Self {
                succeeded: true,
                output,
                error: None,
            },
            (Some(source), ExitPolicy::Lenient) => {
                debug!(error = %source, "Subprocess error ignored under lenient exit policy");
                Self {
                    succeeded: true,
                    output,
                    error: None,
                }
            }
            (Some(source), ExitPolicy::Strict) => Self {
                succeeded: false,
                output,
                error: Some(DiagnosticError::Process {
                    context: error_context,
                    source,
                }),
            },
        }
    }

    /// Failure decided before any subprocess ran
    pub fn rejected(error: DiagnosticError) -> Self {
        Self {
            succeeded: false,
            output: String::new(),
            error: Some(error),
        }
    }
}

/// stdout, then the marker and stderr when stderr is non-empty
pub fn merge_output(stdout: &str, stderr: &str) -> String {
    if stderr.is_empty() {
        stdout.to_string()
    } else {
        let mut output = String::with_capacity(stdout.len() + STDERR_MARKER.len() + stderr.len());
        output.push_str(stdout);
        output.push_str(STDERR_MARKER);
        output.push_str(stderr);
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::ProcessError;

    fn nonzero(stdout: &str, stderr: &str) -> ExecutionOutcome {
        ExecutionOutcome::failure(stdout, stderr, ProcessError::NonZeroExit { code: Some(1) })
    }

    #[test]
    fn test_merge_output() {
        assert_eq!(merge_output("out", ""), "out");
        assert_eq!(merge_output("out", "err"), "out\nSTDERR:\nerr");
        assert_eq!(merge_output("", "err"), "\nSTDERR:\nerr");
    }

    #[test]
    fn test_strict_failure_keeps_output() {
        let verdict = Verdict::from_outcome(
            nonzero("partial", "boom"),
            ExitPolicy::Strict,
            "ping error",
        );

        assert!(!verdict.succeeded);
        assert_eq!(verdict.output, "partial\nSTDERR:\nboom");
        assert_eq!(
            verdict.error.unwrap().to_string(),
            "ping error: exit status 1"
        );
    }

    #[test]
    fn test_lenient_failure_is_success() {
        let verdict = Verdict::from_outcome(
            nonzero("1 hop ok", ""),
            ExitPolicy::Lenient,
            "traceroute error",
        );

        assert!(verdict.succeeded);
        assert_eq!(verdict.output, "1 hop ok");
        assert!(verdict.error.is_none());
    }

    #[test]
    fn test_success() {
        let verdict = Verdict::from_outcome(
            ExecutionOutcome::success("pong", "warning"),
            ExitPolicy::Strict,
            "ping error",
        );
        assert!(verdict.succeeded);
        assert_eq!(verdict.output, "pong\nSTDERR:\nwarning");
    }

    #[test]
    fn test_rejected() {
        let verdict = Verdict::rejected(DiagnosticError::UnknownCommand("foo".to_string()));
        assert!(!verdict.succeeded);
        assert!(verdict.output.is_empty());
    }
}
