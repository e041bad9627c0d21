// Central Error Type for diagnostic dispatch

use crate::domain::DiagnosticKind;
use crate::port::ProcessError;
use thiserror::Error;

/// Why a diagnostic did not succeed
///
/// The `Display` output is what callers see in the `error` field of a result,
/// so the messages are part of the wire contract.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DiagnosticError {
    #[error("unknown command: {0}")]
    UnknownCommand(String),

    #[error("custom command error: missing command template")]
    MissingTemplate,

    #[error("{context}: {source}")]
    Process {
        context: &'static str,
        #[source]
        source: ProcessError,
    },

    #[error("invalid deadline for {kind}: {reason}")]
    InvalidDeadline { kind: DiagnosticKind, reason: String },
}

/// Result type alias using DiagnosticError
pub type Result<T> = std::result::Result<T, DiagnosticError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_unknown_command_message() {
        let err = DiagnosticError::UnknownCommand("foo".to_string());
        assert_eq!(err.to_string(), "unknown command: foo");
    }

    #[test]
    fn test_process_error_is_prefixed_with_context() {
        let err = DiagnosticError::Process {
            context: "ping error",
            source: ProcessError::NonZeroExit { code: Some(2) },
        };
        assert_eq!(err.to_string(), "ping error: exit status 2");

        let err = DiagnosticError::Process {
            context: "curl error",
            source: ProcessError::TimedOut {
                deadline: Duration::from_secs(30),
            },
        };
        assert_eq!(
            err.to_string(),
            "curl error: deadline of 30s exceeded, process killed"
        );
    }
}
