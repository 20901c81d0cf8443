use log::{debug, info};
use std::path::Path;

use crate::cleanup::{PartialFile, SharedCleanupContext};
use crate::error::ShimError;
use crate::http::HttpClient;
use crate::platform::PlatformKey;
use crate::runtime::Runtime;

/// Permission bits of an installed binary on Unix (rwxr-xr-x).
pub const EXECUTABLE_MODE: u32 = 0o755;

/// Downloads one release artifact and installs it as an executable.
pub struct ArtifactFetcher<'a, R: Runtime> {
    runtime: &'a R,
    http_client: &'a HttpClient,
    cleanup_ctx: SharedCleanupContext,
}

impl<'a, R: Runtime> ArtifactFetcher<'a, R> {
    pub fn new(runtime: &'a R, http_client: &'a HttpClient, cleanup_ctx: SharedCleanupContext) -> Self {
        Self {
            runtime,
            http_client,
            cleanup_ctx,
        }
    }

    /// Downloads `url` to `dest`, overwriting whatever is there, and marks it
    /// executable unless `platform` is Windows.
    ///
    /// On any failure the destination file is removed.
    #[tracing::instrument(skip(self))]
    pub async fn fetch(&self, url: &str, dest: &Path, platform: &PlatformKey) -> Result<u64, ShimError> {
        if let Some(dir) = dest.parent().filter(|p| !p.as_os_str().is_empty()) {
            debug!("Creating install directory: {:?}", dir);
            self.runtime
                .create_dir_all(dir)
                .map_err(|e| ShimError::write_failed(dir, e))?;
        }

        // Declared before the writer so the handle is closed before removal
        let partial = PartialFile::new(self.runtime, dest.to_path_buf(), self.cleanup_ctx.clone());
        let mut writer = self
            .runtime
            .create_file(dest)
            .map_err(|e| ShimError::write_failed(dest, e))?;

        let bytes = self.http_client.download_file(url, &mut writer, dest).await?;

        // Close the handle before touching permissions or handing the file out
        drop(writer);

        if !platform.is_windows() {
            debug!("Setting executable permission on {:?}", dest);
            self.runtime
                .set_permissions(dest, EXECUTABLE_MODE)
                .map_err(|e| ShimError::write_failed(dest, e))?;
        }

        partial.commit();
        info!("Installed {} bytes to {:?}", bytes, dest);
        Ok(bytes)
    }
}
