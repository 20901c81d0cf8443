//! Location of the installed delegate binary.
//!
//! The installer and the delegator both derive the path from here, so they
//! agree on it without persisting anything between runs.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::platform::PlatformKey;
use crate::runtime::Runtime;

/// File name of the installed binary: `bin_name`, plus `.exe` on Windows.
pub fn binary_file_name(bin_name: &str, platform: &PlatformKey) -> String {
    if platform.is_windows() {
        format!("{}.exe", bin_name)
    } else {
        bin_name.to_string()
    }
}

pub fn installed_binary_path(install_dir: &Path, bin_name: &str, platform: &PlatformKey) -> PathBuf {
    install_dir.join(binary_file_name(bin_name, platform))
}

/// Default install directory: `<data_local_dir>/<bin_name>/bin`, or `bin`
/// next to the running executable when no data directory is known.
pub fn default_install_dir<R: Runtime>(runtime: &R, bin_name: &str) -> Result<PathBuf> {
    if let Some(data_dir) = runtime.data_local_dir() {
        return Ok(data_dir.join(bin_name).join("bin"));
    }

    let exe = runtime.current_exe()?;
    let exe_dir = exe
        .parent()
        .with_context(|| format!("Executable path {:?} has no parent directory", exe))?;
    Ok(exe_dir.join("bin"))
}
