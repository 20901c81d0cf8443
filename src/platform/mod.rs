//! Platform detection and artifact resolution module
//!
//! This module detects the current platform (OS, architecture and, on Linux,
//! the C library flavor) and maps it to the name of the prebuilt release
//! artifact to download.

mod detection;
mod libc;
mod resolver;

pub use detection::PlatformKey;
pub use libc::{LibcDetector, LibcFlavor, ProbeLibcDetector, LDD_MUSL_MARKER, MUSL_MARKER_FILE};
pub use resolver::{ArtifactDescriptor, PlatformResolver};

#[cfg(test)]
pub use libc::MockLibcDetector;
