//! Thin wrapper around the system `git` binary.
//!
//! All version-control work is delegated to `git` itself; this module only
//! shapes command lines, captures output and maps failures onto
//! [`Error::Process`]. Using the system binary means SSH keys, credential
//! helpers and anything else configured in `~/.gitconfig` work unchanged.
//!
//! A [`Git`] handle is bound to one repository root and passes it via
//! `git -C <root>`, so no operation depends on the process working directory.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::{Error, Result};

/// Handle on a git repository rooted at a fixed directory.
#[derive(Debug, Clone)]
pub struct Git {
    root: PathBuf,
}

impl Git {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The repository root this handle operates on.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Run a git subcommand, returning captured stdout on success.
    ///
    /// A non-zero exit status is an error carrying the command line and the
    /// captured stderr.
    pub fn run<I, S>(&self, args: I) -> Result<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let (output, command) = self.output(args)?;
        if !output.status.success() {
            return Err(Error::Process {
                command,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }

    /// Run a git subcommand, reporting only whether it exited successfully.
    ///
    /// Used for probe-style invocations (`remote get-url`, `rev-parse @{u}`,
    /// `diff --staged --quiet`) where a non-zero exit is an answer, not a
    /// failure. Spawn errors still propagate.
    pub fn succeeds<I, S>(&self, args: I) -> Result<bool>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let (output, _) = self.output(args)?;
        Ok(output.status.success())
    }

    fn output<I, S>(&self, args: I) -> Result<(std::process::Output, String)>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let mut cmd = Command::new("git");
        cmd.arg("-C").arg(&self.root);
        for arg in args {
            cmd.arg(arg.as_ref());
        }
        let command = render_command(&cmd);
        log::debug!("running: {}", command);
        let output = cmd.output().map_err(|e| Error::Process {
            command: command.clone(),
            stderr: e.to_string(),
        })?;
        Ok((output, command))
    }
}

/// Render a command line for logs and error messages.
fn render_command(cmd: &Command) -> String {
    let mut parts = vec![cmd.get_program().to_string_lossy().to_string()];
    parts.extend(cmd.get_args().map(|a| a.to_string_lossy().to_string()));
    parts.join(" ")
}
