//! Capability table
//!
//! Maps every diagnostic kind to the program, argument template, deadline and
//! exit policy for one platform family. Built once per platform so the
//! Windows/POSIX differences live here and nowhere else.

use crate::application::constants::{
    CUSTOM_TIMEOUT, FETCH_TIMEOUT, PING_COUNT, PING_TIMEOUT, TRACEROUTE_TIMEOUT,
};
use crate::domain::{DiagnosticKind, Platform, PlatformFamily};
use crate::error::{DiagnosticError, Result};
use crate::port::ProcessInvocation;
use std::time::Duration;

/// How the caller's target becomes the tool's operand
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperandForm {
    /// Passed through untouched
    Verbatim,
    /// Leading `http://` / `https://` stripped
    HostOnly,
    /// Substituted into the caller's `{url}` template; the result is a shell string
    ShellTemplate,
}

/// How a failed subprocess is judged
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitPolicy {
    /// Any subprocess error fails the diagnostic
    Strict,
    /// Subprocess errors are ignored; captured output counts as success
    Lenient,
}

/// One argument slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Arg {
    Literal(&'static str),
    Operand,
    /// The capability's own deadline in whole seconds, rounded up
    DeadlineSecs,
}

/// Everything needed to run and judge one kind on one platform
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Capability {
    pub program: &'static str,
    pub args: Vec<Arg>,
    pub operand_form: OperandForm,
    pub deadline: Duration,
    pub exit_policy: ExitPolicy,
    /// Prefix of the error message when the subprocess fails
    pub error_context: &'static str,
}

impl Capability {
    /// Expand the argument template around a prepared operand
    pub fn invocation(&self, operand: &str) -> ProcessInvocation {
        let args = self
            .args
            .iter()
            .map(|arg| match arg {
                Arg::Literal(value) => (*value).to_string(),
                Arg::Operand => operand.to_string(),
                Arg::DeadlineSecs => deadline_secs(self.deadline).to_string(),
            })
            .collect();
        ProcessInvocation::new(self.program, args, self.deadline)
    }
}

fn deadline_secs(deadline: Duration) -> u64 {
    let secs = deadline.as_secs() + u64::from(deadline.subsec_nanos() > 0);
    secs.max(1)
}

/// Per-platform table of capabilities, total over DiagnosticKind
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapabilityTable {
    family: PlatformFamily,
    fetch: Capability,
    ping: Capability,
    traceroute: Capability,
    custom: Capability,
}

impl CapabilityTable {
    pub fn for_platform(platform: &Platform) -> Self {
        Self::for_family(platform.family())
    }

    pub fn for_family(family: PlatformFamily) -> Self {
        let windows = family == PlatformFamily::Windows;

        let fetch = Capability {
            program: "curl",
            args: vec![
                Arg::Literal("-i"),
                Arg::Literal("-L"),
                Arg::Literal("--max-time"),
                Arg::DeadlineSecs,
                Arg::Operand,
            ],
            operand_form: OperandForm::Verbatim,
            deadline: FETCH_TIMEOUT,
            exit_policy: ExitPolicy::Strict,
            error_context: "curl error",
        };

        let ping = Capability {
            program: "ping",
            args: vec![
                Arg::Literal(if windows { "-n" } else { "-c" }),
                Arg::Literal(PING_COUNT),
                Arg::Operand,
            ],
            operand_form: OperandForm::HostOnly,
            deadline: PING_TIMEOUT,
            exit_policy: ExitPolicy::Strict,
            error_context: "ping error",
        };

        // Traceroute tools often exit non-zero after printing a usable hop list
        let traceroute = Capability {
            program: if windows { "tracert" } else { "traceroute" },
            args: vec![Arg::Operand],
            operand_form: OperandForm::HostOnly,
            deadline: TRACEROUTE_TIMEOUT,
            exit_policy: ExitPolicy::Lenient,
            error_context: "traceroute error",
        };

        let custom = Capability {
            program: if windows { "cmd" } else { "sh" },
            args: vec![
                Arg::Literal(if windows { "/C" } else { "-c" }),
                Arg::Operand,
            ],
            operand_form: OperandForm::ShellTemplate,
            deadline: CUSTOM_TIMEOUT,
            exit_policy: ExitPolicy::Strict,
            error_context: "custom command error",
        };

        Self {
            family,
            fetch,
            ping,
            traceroute,
            custom,
        }
    }

    pub fn family(&self) -> PlatformFamily {
        self.family
    }

    pub fn get(&self, kind: DiagnosticKind) -> &Capability {
        match kind {
            DiagnosticKind::Fetch => &self.fetch,
            DiagnosticKind::Ping => &self.ping,
            DiagnosticKind::Traceroute => &self.traceroute,
            DiagnosticKind::Custom => &self.custom,
        }
    }

    /// Override the deadline of one kind
    ///
    /// # Errors
    /// - DiagnosticError::InvalidDeadline if `deadline` is zero
    pub fn with_deadline(mut self, kind: DiagnosticKind, deadline: Duration) -> Result<Self> {
        if deadline.is_zero() {
            return Err(DiagnosticError::InvalidDeadline {
                kind,
                reason: "deadline must be greater than zero".to_string(),
            });
        }

        let capability = match kind {
            DiagnosticKind::Fetch => &mut self.fetch,
            DiagnosticKind::Ping => &mut self.ping,
            DiagnosticKind::Traceroute => &mut self.traceroute,
            DiagnosticKind::Custom => &mut self.custom,
        };
        capability.deadline = deadline;
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args_of(table: &CapabilityTable, kind: DiagnosticKind) -> (String, Vec<String>) {
        let invocation = table.get(kind).invocation("example.com");
        (invocation.program, invocation.args)
    }

    #[test]
    fn test_posix_table() {
        let table = CapabilityTable::for_family(PlatformFamily::Posix);

        assert_eq!(
            args_of(&table, DiagnosticKind::Fetch),
            (
                "curl".to_string(),
                vec!["-i", "-L", "--max-time", "30", "example.com"]
                    .into_iter()
                    .map(String::from)
                    .collect::<Vec<String>>()
            )
        );
        assert_eq!(
            args_of(&table, DiagnosticKind::Ping),
            (
                "ping".to_string(),
                vec!["-c".to_string(), "4".to_string(), "example.com".to_string()]
            )
        );
        assert_eq!(
            args_of(&table, DiagnosticKind::Traceroute),
            ("traceroute".to_string(), vec!["example.com".to_string()])
        );
        assert_eq!(
            args_of(&table, DiagnosticKind::Custom),
            (
                "sh".to_string(),
                vec!["-c".to_string(), "example.com".to_string()]
            )
        );
    }

    #[test]
    fn test_windows_table() {
        let table = CapabilityTable::for_platform(&Platform::windows());

        assert_eq!(
            args_of(&table, DiagnosticKind::Ping),
            (
                "ping".to_string(),
                vec!["-n".to_string(), "4".to_string(), "example.com".to_string()]
            )
        );
        assert_eq!(
            args_of(&table, DiagnosticKind::Traceroute),
            ("tracert".to_string(), vec!["example.com".to_string()])
        );
        assert_eq!(
            args_of(&table, DiagnosticKind::Custom),
            (
                "cmd".to_string(),
                vec!["/C".to_string(), "example.com".to_string()]
            )
        );
        // curl syntax is the same everywhere
        assert_eq!(
            table.get(DiagnosticKind::Fetch),
            CapabilityTable::for_family(PlatformFamily::Posix).get(DiagnosticKind::Fetch)
        );
    }

    #[test]
    fn test_deadlines_and_policies() {
        let table = CapabilityTable::for_family(PlatformFamily::Posix);

        assert_eq!(
            table.get(DiagnosticKind::Fetch).deadline,
            Duration::from_secs(30)
        );
        assert_eq!(
            table.get(DiagnosticKind::Ping).deadline,
            Duration::from_secs(15)
        );
        assert_eq!(
            table.get(DiagnosticKind::Traceroute).deadline,
            Duration::from_secs(60)
        );
        assert_eq!(
            table.get(DiagnosticKind::Custom).deadline,
            Duration::from_secs(30)
        );

        // Only traceroute is lenient
        for kind in DiagnosticKind::ALL {
            let expected = if kind == DiagnosticKind::Traceroute {
                ExitPolicy::Lenient
            } else {
                ExitPolicy::Strict
            };
            assert_eq!(table.get(kind).exit_policy, expected, "{}", kind);
        }
    }

    #[test]
    fn test_deadline_override() {
        let table = tokio_test::assert_ok!(CapabilityTable::for_family(PlatformFamily::Posix)
            .with_deadline(DiagnosticKind::Ping, Duration::from_secs(3)));
        assert_eq!(
            table.get(DiagnosticKind::Ping).deadline,
            Duration::from_secs(3)
        );
        assert_eq!(
            table.get(DiagnosticKind::Ping).invocation("h").deadline,
            Duration::from_secs(3)
        );

        let err = tokio_test::assert_err!(CapabilityTable::for_family(PlatformFamily::Posix)
            .with_deadline(DiagnosticKind::Custom, Duration::ZERO));
        assert!(matches!(
            err,
            DiagnosticError::InvalidDeadline {
                kind: DiagnosticKind::Custom,
                ..
            }
        ));
    }

    #[test]
    fn test_fetch_override_reaches_curl_max_time() {
        let table = tokio_test::assert_ok!(CapabilityTable::for_family(PlatformFamily::Posix)
            .with_deadline(DiagnosticKind::Fetch, Duration::from_secs(90)));

        let invocation = table.get(DiagnosticKind::Fetch).invocation("example.com");
        assert_eq!(invocation.deadline, Duration::from_secs(90));
        assert_eq!(
            invocation.args,
            vec!["-i", "-L", "--max-time", "90", "example.com"]
        );
    }

    #[test]
    fn test_sub_second_deadline_rounds_up() {
        assert_eq!(deadline_secs(Duration::from_millis(300)), 1);
        assert_eq!(deadline_secs(Duration::from_millis(1500)), 2);
        assert_eq!(deadline_secs(Duration::from_secs(30)), 30);
    }
}
