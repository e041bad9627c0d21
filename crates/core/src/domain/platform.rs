// Host platform descriptor
// Injected into the executor instead of querying the OS inline, so tests can
// exercise Windows syntax on any host.

/// Platform family: decides which invocation syntax applies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlatformFamily {
    Windows,
    Posix,
}

/// The operating system the executor runs on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Platform {
    family: PlatformFamily,
    os: String,
}

impl Platform {
    /// Platform of the running process
    pub fn current() -> Self {
        Self::from_os_name(std::env::consts::OS)
    }

    /// Build a descriptor from an OS identifier (`linux`, `macos`, `windows`, ...)
    pub fn from_os_name(os: impl Into<String>) -> Self {
        let os = os.into();
        let family = if os == "windows" {
            PlatformFamily::Windows
        } else {
            PlatformFamily::Posix
        };
        Self { family, os }
    }

    pub fn windows() -> Self {
        Self::from_os_name("windows")
    }

    pub fn posix(os: impl Into<String>) -> Self {
        Self {
            family: PlatformFamily::Posix,
            os: os.into(),
        }
    }

    pub fn family(&self) -> PlatformFamily {
        self.family
    }

    /// OS identifier reported back to callers
    pub fn os(&self) -> &str {
        &self.os
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_family_from_os_name() {
        assert_eq!(
            Platform::from_os_name("windows").family(),
            PlatformFamily::Windows
        );
        assert_eq!(
            Platform::from_os_name("linux").family(),
            PlatformFamily::Posix
        );
        assert_eq!(
            Platform::from_os_name("macos").family(),
            PlatformFamily::Posix
        );
        assert_eq!(
            Platform::from_os_name("freebsd").family(),
            PlatformFamily::Posix
        );
    }

    #[test]
    fn test_current_reports_compile_target() {
        let platform = Platform::current();
        assert_eq!(platform.os(), std::env::consts::OS);
        assert_eq!(
            platform.family() == PlatformFamily::Windows,
            cfg!(windows)
        );
    }
}
