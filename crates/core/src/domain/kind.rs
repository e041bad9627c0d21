// Diagnostic kinds and their wire labels

use crate::error::DiagnosticError;
use std::fmt;
use std::str::FromStr;

/// The diagnostic to run against a target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    /// HTTP probe (`curl`)
    Fetch,
    Ping,
    Traceroute,
    /// Caller-supplied shell template
    Custom,
}

impl DiagnosticKind {
    pub const ALL: [DiagnosticKind; 4] = [
        DiagnosticKind::Fetch,
        DiagnosticKind::Ping,
        DiagnosticKind::Traceroute,
        DiagnosticKind::Custom,
    ];

    /// Label used for this kind in the `command` field of requests
    pub fn label(&self) -> &'static str {
        match self {
            DiagnosticKind::Fetch => "curl",
            DiagnosticKind::Ping => "ping",
            DiagnosticKind::Traceroute => "tracert",
            DiagnosticKind::Custom => "custom",
        }
    }
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for DiagnosticKind {
    type Err = DiagnosticError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.label() == s)
            .ok_or_else(|| DiagnosticError::UnknownCommand(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_round_trip() {
        for kind in DiagnosticKind::ALL {
            assert_eq!(kind.label().parse::<DiagnosticKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_labels_are_case_sensitive() {
        assert!("PING".parse::<DiagnosticKind>().is_err());
        assert!("traceroute".parse::<DiagnosticKind>().is_err());
    }

    #[test]
    fn test_unknown_label() {
        let err = "foo".parse::<DiagnosticKind>().unwrap_err();
        assert_eq!(err, DiagnosticError::UnknownCommand("foo".to_string()));
    }
}
