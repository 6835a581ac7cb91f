//! # Aggregation Workspace
//!
//! The workspace is the scratch area where the external aggregation tool
//! materializes one local clone per source repository. Two lifecycles exist:
//!
//! - **Ephemeral** (default): a fresh temp directory, removed when the run
//!   ends, success or failure alike. `--no-clean` keeps it for inspection.
//! - **Cached** (`--cache`): a fixed directory under the platform cache root,
//!   created on demand and never deleted. Reuse assumes one run at a time;
//!   no locking is provided.
//!
//! This module also bootstraps the output repository and drives the
//! aggregation tool itself. The tool's output layout (one subdirectory per
//! repository name) is a fixed contract the rest of the pipeline relies on.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::TempDir;

use crate::error::{Error, Result};
use crate::git::Git;

/// Name of the external aggregation binary.
const AGGREGATOR_BIN: &str = "gitaggregate";

/// Scratch directory holding the per-repository aggregation clones.
#[derive(Debug)]
pub struct Workspace {
    root: PathBuf,
    /// Present only for ephemeral workspaces; dropping it removes the tree.
    temp: Option<TempDir>,
}

impl Workspace {
    /// Create a fresh ephemeral workspace, removed on drop.
    pub fn ephemeral() -> Result<Self> {
        let temp = TempDir::new()?;
        Ok(Self {
            root: temp.path().to_path_buf(),
            temp: Some(temp),
        })
    }

    /// Open the persistent cached workspace, creating it if needed.
    ///
    /// Lives at `<platform cache dir>/addons-filter/workspace` and is never
    /// deleted by this tool.
    pub fn cached() -> Result<Self> {
        let root = dirs::cache_dir()
            .unwrap_or_else(|| PathBuf::from(".addons-filter-cache"))
            .join("addons-filter")
            .join("workspace");
        fs::create_dir_all(&root)?;
        Ok(Self { root, temp: None })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the aggregation clone for a repository name.
    pub fn clone_path(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    /// Disarm cleanup so the directory survives the run (`--no-clean`).
    #[allow(deprecated)]
    pub fn keep(&mut self) {
        if let Some(temp) = self.temp.take() {
            let _ = temp.into_path();
        }
    }
}

/// Initialize the output repository, creating the directory if absent.
///
/// `git init` is idempotent on an existing repository.
pub fn init_output_repo(output_path: &Path) -> Result<Git> {
    if !output_path.is_dir() {
        println!(
            "Initializing git repository in '{}'",
            output_path.display()
        );
        fs::create_dir_all(output_path)?;
    }
    let git = Git::new(output_path);
    git.run(["init"])?;
    Ok(git)
}

/// Invoke the aggregation tool so it populates the workspace with one clone
/// per repository listed in `config_path`.
pub fn aggregate(
    workspace_root: &Path,
    config_path: &Path,
    env_file: Option<&Path>,
) -> Result<()> {
    let mut cmd = Command::new(AGGREGATOR_BIN);
    cmd.current_dir(workspace_root).arg("-c").arg(config_path);
    if let Some(env_file) = env_file {
        cmd.arg("-e").arg("--env-file").arg(env_file);
    }

    let command = format!(
        "{} {}",
        AGGREGATOR_BIN,
        cmd.get_args()
            .map(|a| a.to_string_lossy().to_string())
            .collect::<Vec<_>>()
            .join(" ")
    );
    log::debug!("running: {}", command);

    let output = cmd.output().map_err(|e| Error::Process {
        command: command.clone(),
        stderr: e.to_string(),
    })?;
    if !output.status.success() {
        return Err(Error::Process {
            command,
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }
    println!(
        "Writing aggregation output to '{}'",
        workspace_root.display()
    );
    Ok(())
}
