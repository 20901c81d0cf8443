use log::{debug, warn};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::runtime::Runtime;

/// Tracks paths that need cleanup on interruption
#[derive(Default)]
pub struct CleanupContext {
    #[cfg(test)]
    pub paths: Vec<PathBuf>,
    #[cfg(not(test))]
    paths: Vec<PathBuf>,
}

impl CleanupContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a path to be cleaned up on interruption
    pub fn add(&mut self, path: PathBuf) {
        self.paths.push(path);
    }

    /// Remove a path from cleanup list (e.g., when operation succeeds)
    pub fn remove(&mut self, path: &Path) {
        self.paths.retain(|p| p != path);
    }

    /// Clean up all registered paths
    pub fn cleanup(&self) {
        for path in &self.paths {
            debug!("Cleaning up: {:?}", path);
            let _ = std::fs::remove_file(path);
        }
    }
}

/// Type alias for shared cleanup context
pub type SharedCleanupContext = Arc<Mutex<CleanupContext>>;

/// Create a new shared cleanup context
pub fn new_shared() -> SharedCleanupContext {
    Arc::new(Mutex::new(CleanupContext::new()))
}

/// RAII guard over a file that is being written.
///
/// The file is deleted when the guard drops unless [`PartialFile::commit`] was
/// called first, so every early return leaves nothing half-written behind.
/// While alive, the path is also registered in the shared cleanup context so
/// an interrupt handler can remove it.
pub struct PartialFile<'a, R: Runtime> {
    runtime: &'a R,
    path: PathBuf,
    ctx: SharedCleanupContext,
    committed: bool,
}

impl<'a, R: Runtime> PartialFile<'a, R> {
    pub fn new(runtime: &'a R, path: PathBuf, ctx: SharedCleanupContext) -> Self {
        if let Ok(mut guard) = ctx.lock() {
            guard.add(path.clone());
        }
        Self {
            runtime,
            path,
            ctx,
            committed: false,
        }
    }

    /// Keep the file: the write completed.
    pub fn commit(mut self) {
        self.committed = true;
    }
}

impl<R: Runtime> Drop for PartialFile<'_, R> {
    fn drop(&mut self) {
        if let Ok(mut guard) = self.ctx.lock() {
            guard.remove(&self.path);
        }

        if self.committed {
            return;
        }

        debug!("Removing partial file {:?}", self.path);
        if self.runtime.exists(&self.path) {
            if let Err(e) = self.runtime.remove_file(&self.path) {
                warn!("Failed to remove partial file {:?}: {:#}", self.path, e);
            }
        }
    }
}
