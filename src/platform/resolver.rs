use log::info;
use std::fmt;

use super::{LibcDetector, LibcFlavor, PlatformKey};
use crate::error::ShimError;

/// Supported platforms and the artifact suffix published for each.
static PLATFORM_ARTIFACTS: &[(&str, &str)] = &[
    ("linux-x64", "linux-amd64"),
    ("linux-arm64", "linux-arm64"),
    ("darwin-x64", "darwin-amd64"),
    ("darwin-arm64", "darwin-arm64"),
    ("win32-x64", "windows-amd64.exe"),
];

/// The only key whose build depends on the C library.
const LIBC_SENSITIVE_KEY: &str = "linux-x64";

/// Artifact suffix used instead of the default on musl systems.
const MUSL_ARTIFACT: &str = "linux-musl-amd64";

/// Remote file name of the release artifact for one platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactDescriptor {
    pub name: String,
}

impl fmt::Display for ArtifactDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Maps a platform to its release artifact.
pub struct PlatformResolver<D: LibcDetector> {
    artifact_prefix: String,
    libc: D,
}

impl<D: LibcDetector> PlatformResolver<D> {
    pub fn new(artifact_prefix: impl Into<String>, libc: D) -> Self {
        Self {
            artifact_prefix: artifact_prefix.into(),
            libc,
        }
    }

    #[tracing::instrument(skip(self))]
    pub fn resolve(&self, platform: &PlatformKey) -> Result<ArtifactDescriptor, ShimError> {
        let key = platform.to_string();

        let suffix = PLATFORM_ARTIFACTS
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, suffix)| *suffix)
            .ok_or_else(|| ShimError::UnsupportedPlatform { key: key.clone() })?;

        let suffix = if key == LIBC_SENSITIVE_KEY && self.libc.detect() == LibcFlavor::Alternative {
            println!("Detected Alpine/musl environment. Switching to musl binary.");
            MUSL_ARTIFACT
        } else {
            suffix
        };

        let name = format!("{}-{}", self.artifact_prefix, suffix);
        info!("Resolved {} to artifact {}", key, name);
        Ok(ArtifactDescriptor { name })
    }
}
