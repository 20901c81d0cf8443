//! Child process operations.

use anyhow::{Context, Result};
use std::ffi::OsString;
use std::path::Path;
use std::process::{Command, ExitStatus, Stdio};

use super::RealRuntime;

/// How a child process ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChildExit {
    /// Normal termination with an exit code.
    Code(i32),
    /// Terminated by a signal (Unix only).
    Signal(i32),
}

impl ChildExit {
    /// Exit code the parent should adopt.
    /// Signals map to `128 + signal`, as shells report them.
    pub fn exit_code(self) -> i32 {
        match self {
            ChildExit::Code(code) => code,
            ChildExit::Signal(signal) => 128 + signal,
        }
    }
}

impl From<ExitStatus> for ChildExit {
    fn from(status: ExitStatus) -> Self {
        if let Some(code) = status.code() {
            return ChildExit::Code(code);
        }

        #[cfg(unix)]
        {
            use std::os::unix::process::ExitStatusExt;
            if let Some(signal) = status.signal() {
                return ChildExit::Signal(signal);
            }
        }

        ChildExit::Code(1)
    }
}

impl RealRuntime {
    #[tracing::instrument(skip(self))]
    pub(crate) fn command_output_impl(&self, program: &str, args: &[String]) -> Result<String> {
        let output = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .with_context(|| format!("Failed to run {}", program))?;

        let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
        combined.push_str(&String::from_utf8_lossy(&output.stderr));
        Ok(combined)
    }

    #[tracing::instrument(skip(self))]
    pub(crate) fn run_inherited_impl(
        &self,
        program: &Path,
        args: &[OsString],
    ) -> std::io::Result<ChildExit> {
        #[cfg(unix)]
        let _interrupts = InterruptGuard::install();

        let status = Command::new(program)
            .args(args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()?;
        Ok(status.into())
    }
}

/// Keeps terminal interrupts from killing the parent while a child runs.
///
/// SIGINT and SIGQUIT go to the whole foreground process group. The parent
/// catches them with a handler that does nothing and leaves the child to decide.
/// A caught signal is reset to its default disposition across exec, so the
/// child still sees Ctrl-C normally (an ignored one would be inherited).
#[cfg(unix)]
struct InterruptGuard {
    previous: Vec<(nix::sys::signal::Signal, nix::sys::signal::SigAction)>,
}

#[cfg(unix)]
extern "C" fn ignore_interrupt(_: nix::libc::c_int) {}

#[cfg(unix)]
impl InterruptGuard {
    fn install() -> Self {
        use nix::sys::signal::{SaFlags, SigAction, SigHandler, SigSet, Signal, sigaction};

        let action = SigAction::new(
            SigHandler::Handler(ignore_interrupt),
            SaFlags::SA_RESTART,
            SigSet::empty(),
        );

        let mut previous = Vec::new();
        for signal in [Signal::SIGINT, Signal::SIGQUIT] {
            // SAFETY: the handler is async-signal-safe; it does nothing.
            match unsafe { sigaction(signal, &action) } {
                Ok(old) => previous.push((signal, old)),
                Err(e) => log::warn!("Failed to install {} handler: {}", signal, e),
            }
        }
        Self { previous }
    }
}

#[cfg(unix)]
impl Drop for InterruptGuard {
    fn drop(&mut self) {
        for (signal, old) in self.previous.drain(..) {
            // SAFETY: restores the disposition that was in place before install.
            if let Err(e) = unsafe { nix::sys::signal::sigaction(signal, &old) } {
                log::warn!("Failed to restore {} handler: {}", signal, e);
            }
        }
    }
}
