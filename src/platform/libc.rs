use log::debug;
use std::path::Path;

use crate::runtime::Runtime;

/// File present on Alpine Linux, the most common musl distribution.
pub const MUSL_MARKER_FILE: &str = "/etc/alpine-release";

/// Substring printed by musl's `ldd --version`.
pub const LDD_MUSL_MARKER: &str = "musl";

/// C library a Linux binary must be linked against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LibcFlavor {
    /// glibc
    #[default]
    Standard,
    /// musl
    Alternative,
}

/// Trait for C library detection (useful for testing and for swapping in
/// other strategies such as reading the dynamic linker directly)
#[cfg_attr(test, mockall::automock)]
pub trait LibcDetector: Send + Sync {
    fn detect(&self) -> LibcFlavor;
}

/// Detects musl by looking for the Alpine release file, then by asking `ldd`.
///
/// Anything inconclusive, including a missing `ldd`, counts as glibc so that
/// installation is never blocked by the probe itself.
pub struct ProbeLibcDetector<'a, R: Runtime> {
    runtime: &'a R,
}

impl<'a, R: Runtime> ProbeLibcDetector<'a, R> {
    pub fn new(runtime: &'a R) -> Self {
        Self { runtime }
    }
}

impl<R: Runtime> LibcDetector for ProbeLibcDetector<'_, R> {
    #[tracing::instrument(skip(self))]
    fn detect(&self) -> LibcFlavor {
        if self.runtime.exists(Path::new(MUSL_MARKER_FILE)) {
            debug!("Found {}, assuming musl", MUSL_MARKER_FILE);
            return LibcFlavor::Alternative;
        }

        match self
            .runtime
            .command_output("ldd", &["--version".to_string()])
        {
            Ok(output) if output.contains(LDD_MUSL_MARKER) => {
                debug!("ldd reports musl");
                LibcFlavor::Alternative
            }
            Ok(_) => LibcFlavor::Standard,
            Err(e) => {
                debug!("ldd probe failed ({:#}), assuming glibc", e);
                LibcFlavor::Standard
            }
        }
    }
}
