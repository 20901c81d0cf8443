use std::fmt;

/// Operating system and CPU architecture of a host, spelled the way release
/// artifacts are keyed (`linux`/`darwin`/`win32`, `x64`/`arm64`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformKey {
    pub os: String,
    pub arch: String,
}

impl PlatformKey {
    pub fn new(os: impl Into<String>, arch: impl Into<String>) -> Self {
        Self {
            os: os.into(),
            arch: arch.into(),
        }
    }

    /// Detect the current platform
    pub fn detect() -> Self {
        Self {
            os: Self::detect_os(),
            arch: Self::detect_arch(),
        }
    }

    pub fn is_windows(&self) -> bool {
        self.os == "win32"
    }

    fn detect_os() -> String {
        #[cfg(target_os = "macos")]
        {
            "darwin".to_string()
        }
        #[cfg(target_os = "linux")]
        {
            "linux".to_string()
        }
        #[cfg(target_os = "windows")]
        {
            "win32".to_string()
        }
        #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
        {
            std::env::consts::OS.to_string()
        }
    }

    fn detect_arch() -> String {
        #[cfg(target_arch = "x86_64")]
        {
            "x64".to_string()
        }
        #[cfg(target_arch = "aarch64")]
        {
            "arm64".to_string()
        }
        #[cfg(target_arch = "x86")]
        {
            "ia32".to_string()
        }
        #[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64", target_arch = "x86")))]
        {
            std::env::consts::ARCH.to_string()
        }
    }
}

impl fmt::Display for PlatformKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.os, self.arch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_detect() {
        let key = PlatformKey::detect();

        assert!(!key.os.is_empty());
        assert!(!key.arch.is_empty());

        #[cfg(target_os = "macos")]
        assert_eq!(key.os, "darwin");

        #[cfg(target_os = "linux")]
        assert_eq!(key.os, "linux");

        #[cfg(target_os = "windows")]
        {
            assert_eq!(key.os, "win32");
            assert!(key.is_windows());
        }

        #[cfg(target_arch = "x86_64")]
        assert_eq!(key.arch, "x64");

        #[cfg(target_arch = "aarch64")]
        assert_eq!(key.arch, "arm64");
    }

    #[test]
    fn test_platform_key_display() {
        assert_eq!(PlatformKey::new("linux", "x64").to_string(), "linux-x64");
        assert_eq!(PlatformKey::new("win32", "x64").to_string(), "win32-x64");
    }

    #[test]
    fn test_is_windows() {
        assert!(PlatformKey::new("win32", "x64").is_windows());
        assert!(!PlatformKey::new("linux", "x64").is_windows());
        assert!(!PlatformKey::new("darwin", "arm64").is_windows());
    }
}
