// Host information (logged at startup)
// reason: sysinfo for cross-platform OS details
use sysinfo::System;
use tracing::info;

/// Description of the machine the server runs on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostInfo {
    /// OS identifier, same value reported in diagnostic results
    pub os: String,
    pub arch: String,
    pub os_version: Option<String>,
    pub kernel_version: Option<String>,
    pub hostname: Option<String>,
}

impl HostInfo {
    /// Collect details about the current host
    pub fn collect() -> Self {
        Self {
            os: std::env::consts::OS.to_string(),
            arch: std::env::consts::ARCH.to_string(),
            os_version: System::long_os_version(),
            kernel_version: System::kernel_version(),
            hostname: System::host_name(),
        }
    }

    /// Emit the host details as one structured log line
    pub fn log(&self) {
        info!(
            os = %self.os,
            arch = %self.arch,
            os_version = self.os_version.as_deref().unwrap_or("unknown"),
            kernel = self.kernel_version.as_deref().unwrap_or("unknown"),
            hostname = self.hostname.as_deref().unwrap_or("unknown"),
            "Host details"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collect() {
        let info = HostInfo::collect();

        assert_eq!(info.os, std::env::consts::OS);
        assert_eq!(info.arch, std::env::consts::ARCH);
        assert!(!info.os.is_empty());
    }
}
