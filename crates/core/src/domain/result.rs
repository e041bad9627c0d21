// Diagnostic result and connection details

use crate::domain::DiagnosticKind;
use chrono::{DateTime, SecondsFormat, Utc};
use std::collections::BTreeMap;
use std::time::Duration;

/// Metadata key: the command label as requested
pub const METADATA_COMMAND_TYPE: &str = "command_type";

/// Metadata key: rendered execution time
pub const METADATA_EXECUTION_TIME: &str = "execution_time";

/// Where and when a diagnostic ran
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionInfo {
    /// Target exactly as supplied by the caller
    pub target: String,
    pub started_at: DateTime<Utc>,
    /// OS of the executing host, never the target's
    pub host_os: String,
}

impl ConnectionInfo {
    /// Start time as RFC3339 (second precision, `Z` suffix)
    pub fn timestamp(&self) -> String {
        self.started_at.to_rfc3339_opts(SecondsFormat::Secs, true)
    }
}

/// Normalized outcome of one diagnostic
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticResult {
    pub succeeded: bool,
    /// Command label as requested (may be an unknown label)
    pub command: String,
    /// None when the label did not resolve to a kind
    pub kind: Option<DiagnosticKind>,
    /// stdout, followed by the stderr marker and stderr when stderr is non-empty
    pub raw_output: String,
    pub error_message: Option<String>,
    pub duration: Duration,
    pub connection: ConnectionInfo,
    pub metadata: BTreeMap<String, String>,
}

impl DiagnosticResult {
    /// Human-readable duration (see [`format_duration`])
    pub fn duration_display(&self) -> String {
        format_duration(self.duration)
    }
}

/// Render a duration the way Go's `time.Duration.String()` does
///
/// Units below one second pick the largest of `ns`, `µs` or `ms`. From one
/// second up the form is `[Nh][Nm]N.Fs`. Fractions carry full nanosecond
/// precision with trailing zeros dropped: `1.250017999s`, `15.2ms`, `850µs`,
/// `1m30s`.
pub fn format_duration(duration: Duration) -> String {
    let nanos = duration.as_nanos();
    if nanos == 0 {
        return "0s".to_string();
    }
    if nanos < 1_000 {
        return format!("{}ns", nanos);
    }
    if nanos < 1_000_000 {
        return format!("{}µs", decimal(nanos, 3));
    }
    if nanos < 1_000_000_000 {
        return format!("{}ms", decimal(nanos, 6));
    }

    let total_secs = duration.as_secs();
    let hours = total_secs / 3600;
    let minutes = (total_secs / 60) % 60;
    let secs_nanos = u128::from(total_secs % 60) * 1_000_000_000
        + u128::from(duration.subsec_nanos());

    let mut rendered = String::new();
    if hours > 0 {
        rendered.push_str(&format!("{}h{}m", hours, minutes));
    } else if minutes > 0 {
        rendered.push_str(&format!("{}m", minutes));
    }
    rendered.push_str(&decimal(secs_nanos, 9));
    rendered.push('s');
    rendered
}

/// `value / 10^scale` as a decimal without trailing fractional zeros
fn decimal(value: u128, scale: u32) -> String {
    let divisor = 10u128.pow(scale);
    let whole = value / divisor;
    let fraction = value % divisor;
    if fraction == 0 {
        return whole.to_string();
    }
    let digits = format!("{:0width$}", fraction, width = scale as usize);
    format!("{}.{}", whole, digits.trim_end_matches('0'))
}
