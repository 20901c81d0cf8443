//! Runs the installed binary in place of the shim.

use log::debug;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::error::{SPAWN_FAILED_EXIT_CODE, ShimError};
use crate::runtime::Runtime;

/// Runs the installed binary with the caller's arguments and stdio.
pub struct ProcessDelegator<'a, R: Runtime> {
    runtime: &'a R,
    binary: PathBuf,
}

impl<'a, R: Runtime> ProcessDelegator<'a, R> {
    pub fn new(runtime: &'a R, binary: PathBuf) -> Self {
        Self { runtime, binary }
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }

    /// Runs the child to completion and returns the code the parent should exit with.
    #[tracing::instrument(skip(self), fields(binary = ?self.binary))]
    pub fn run(&self, args: &[OsString]) -> Result<i32, ShimError> {
        debug!("Delegating to {:?} with {} argument(s)", self.binary, args.len());

        let exit = self
            .runtime
            .run_inherited(&self.binary, args)
            .map_err(|source| ShimError::SpawnFailed {
                path: self.binary.clone(),
                source,
            })?;

        debug!("Child exited with {:?}", exit);
        Ok(exit.exit_code())
    }

    /// Like [`run`](Self::run), but reports a spawn failure on stderr and
    /// maps it to [`SPAWN_FAILED_EXIT_CODE`].
    pub fn run_to_exit_code(&self, args: &[OsString]) -> i32 {
        self.run(args).unwrap_or_else(|err| {
            eprintln!("{}", err);
            eprintln!("Binary path: {}", self.binary.display());
            SPAWN_FAILED_EXIT_CODE
        })
    }
}
