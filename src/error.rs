//! Error types shared by the resolver, fetcher, and delegator.

use std::path::PathBuf;
use thiserror::Error;

/// Exit status used when the delegate binary cannot be started at all.
///
/// Follows the shell's "command not found" convention. A child can still exit
/// with 127 itself, so the value is conventional rather than unique.
pub const SPAWN_FAILED_EXIT_CODE: i32 = 127;

#[derive(Debug, Error)]
pub enum ShimError {
    #[error("Unsupported platform: {key}")]
    UnsupportedPlatform { key: String },

    #[error("Failed to download binary from {url}: {cause}")]
    DownloadFailed { url: String, cause: String },

    #[error("Failed to write {}: {source:#}", path.display())]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("Failed to start subprocess: {source}")]
    SpawnFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ShimError {
    pub(crate) fn write_failed(path: impl Into<PathBuf>, source: impl Into<anyhow::Error>) -> Self {
        ShimError::WriteFailed {
            path: path.into(),
            source: source.into(),
        }
    }

    pub(crate) fn download_failed(url: impl Into<String>, cause: impl ToString) -> Self {
        ShimError::DownloadFailed {
            url: url.into(),
            cause: cause.to_string(),
        }
    }
}
