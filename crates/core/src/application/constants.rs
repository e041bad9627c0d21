// Diagnostic constants (no magic values)
use std::time::Duration;

/// Deadline for the HTTP probe (30s)
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Deadline for ping (15s)
pub const PING_TIMEOUT: Duration = Duration::from_secs(15);

/// Deadline for traceroute (60s, hop-by-hop probing is slow)
pub const TRACEROUTE_TIMEOUT: Duration = Duration::from_secs(60);

/// Deadline for custom shell commands (30s)
pub const CUSTOM_TIMEOUT: Duration = Duration::from_secs(30);

/// Echo requests sent by ping
pub const PING_COUNT: &str = "4";

/// Placeholder replaced by the target in custom templates
pub const URL_PLACEHOLDER: &str = "{url}";

/// Separates stdout from stderr in the combined output
pub const STDERR_MARKER: &str = "\nSTDERR:\n";

/// Schemes stripped from ping/traceroute targets, applied in this order
pub const STRIPPED_SCHEMES: [&str; 2] = ["http://", "https://"];
