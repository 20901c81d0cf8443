//! Runtime abstraction for system operations.
//!
//! This module provides a trait-based abstraction over system operations,
//! enabling dependency injection and testability.
//!
//! # Structure
//!
//! - `env` - Environment variables and well-known directories
//! - `fs` - File system operations (create, remove, permissions)
//! - `process` - Child processes (captured output, inherited stdio)

mod env;
mod fs;
mod process;

use anyhow::Result;
use std::env as std_env;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

pub use process::ChildExit;

#[cfg_attr(test, mockall::automock)]
pub trait Runtime: Send + Sync {
    // Environment
    fn env_var(&self, key: &str) -> Result<String, std_env::VarError>;
    fn current_exe(&self) -> Result<PathBuf>;
    fn data_local_dir(&self) -> Option<PathBuf>;

    // File System
    fn exists(&self, path: &Path) -> bool;
    fn create_dir_all(&self, path: &Path) -> Result<()>;
    fn create_file(&self, path: &Path) -> Result<Box<dyn std::io::Write + Send>>;
    fn remove_file(&self, path: &Path) -> Result<()>;

    /// Set file permissions (mode) on Unix systems. No-op on Windows.
    fn set_permissions(&self, path: &Path, mode: u32) -> Result<()>;

    // Processes
    /// Run a command to completion and return its stdout followed by its stderr.
    /// Errors only when the command cannot be started; a non-zero exit still
    /// yields its output.
    fn command_output(&self, program: &str, args: &[String]) -> Result<String>;

    /// Run a program with inherited stdin/stdout/stderr and wait for it.
    fn run_inherited(&self, program: &Path, args: &[OsString]) -> std::io::Result<ChildExit>;
}

pub struct RealRuntime;

impl Runtime for RealRuntime {
    fn env_var(&self, key: &str) -> Result<String, std_env::VarError> {
        self.env_var_impl(key)
    }

    fn current_exe(&self) -> Result<PathBuf> {
        self.current_exe_impl()
    }

    fn data_local_dir(&self) -> Option<PathBuf> {
        self.data_local_dir_impl()
    }

    fn exists(&self, path: &Path) -> bool {
        self.exists_impl(path)
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        self.create_dir_all_impl(path)
    }

    fn create_file(&self, path: &Path) -> Result<Box<dyn std::io::Write + Send>> {
        self.create_file_impl(path)
    }

    fn remove_file(&self, path: &Path) -> Result<()> {
        self.remove_file_impl(path)
    }

    fn set_permissions(&self, path: &Path, mode: u32) -> Result<()> {
        self.set_permissions_impl(path, mode)
    }

    fn command_output(&self, program: &str, args: &[String]) -> Result<String> {
        self.command_output_impl(program, args)
    }

    fn run_inherited(&self, program: &Path, args: &[OsString]) -> std::io::Result<ChildExit> {
        self.run_inherited_impl(program, args)
    }
}
