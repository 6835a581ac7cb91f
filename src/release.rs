//! # Release Orchestrator
//!
//! Drives the full filtering pass: clear stale modules from the output tree,
//! run the repository filter for every addon group in configuration order,
//! then either leave the result staged-free for inspection (dry run) or
//! commit it with the synthesized traceability message and optionally push.
//!
//! There are no retries: any git failure aborts the run, and a partially
//! filtered working tree is an accepted outcome of failure mid-run.

use std::fs;
use std::path::Path;

use crate::ci::CiContext;
use crate::config::{repo_for_group, AddonGroup, Repos};
use crate::error::{Error, Result};
use crate::filter::filter_repo;
use crate::git::Git;
use crate::manifest::is_module;
use crate::output::{print_header, OutputConfig};

/// Where to push when both an upstream and a CI branch are available.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PushPolicy {
    /// An existing upstream wins silently; the CI branch is the fallback.
    #[default]
    PreferUpstream,
    /// Under CI, push to the CI-named branch even when an upstream exists.
    PreferCiBranch,
}

/// Orchestrator parameters, resolved once at the CLI boundary.
#[derive(Debug, Default)]
pub struct ReleaseOptions {
    /// Commit the filtered result. Off means dry run: filtered files stay in
    /// the working tree, nothing is staged or committed.
    pub release: bool,
    /// Push after a successful commit.
    pub push: bool,
    /// CI context, present only when running in CI mode.
    pub ci: Option<CiContext>,
    pub push_policy: PushPolicy,
}

/// Run the full release pass over all configured addon groups.
pub fn run(
    output: &Git,
    workspace_root: &Path,
    repos: &Repos,
    groups: &[AddonGroup],
    opts: &ReleaseOptions,
    out: &OutputConfig,
) -> Result<()> {
    clear_stale_modules(output)?;

    let mut messages = Vec::with_capacity(groups.len());
    for group in groups {
        print_header(out, &format!("Filtering '{}'", group.name), '-');
        let spec = repo_for_group(repos, &group.name)?;
        messages.push(filter_repo(
            output,
            workspace_root,
            &group.name,
            spec,
            &group.patterns,
        )?);
    }
    print_header(out, "Finished filtering", '*');

    if !opts.release {
        // Inspection mode: keep working files, leave nothing staged
        output.run(["reset"])?;
        println!("Dry run, changes left uncommitted");
        return Ok(());
    }

    let staged_changes = !output.succeeds(["diff", "--staged", "--quiet"])?;
    if messages.iter().any(|m| !m.is_empty()) && staged_changes {
        let header = format!(
            "[AUTO] {} {}",
            env!("CARGO_PKG_NAME"),
            env!("CARGO_PKG_VERSION")
        );
        let mut lines = vec![header];
        lines.extend(messages);
        let message = lines.join("\n");
        output.run(["commit", "-m", message.as_str()])?;
        println!("Changes committed");

        if opts.push {
            push(output, opts)?;
            println!("Commit pushed to remote");
        }
    } else {
        println!("No changes, nothing committed");
    }
    Ok(())
}

/// Remove previously imported modules from the output tree.
///
/// Index removal keeps the tree and index consistent; a module that exists
/// only in the working tree falls back to plain filesystem deletion so no
/// orphan survives a group being dropped from configuration.
fn clear_stale_modules(output: &Git) -> Result<()> {
    let mut names: Vec<String> = Vec::new();
    for entry in fs::read_dir(output.root())? {
        let entry = entry?;
        if is_module(&entry.path()) {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    names.sort();

    for name in &names {
        if output.run(["rm", "-rf", name.as_str()]).is_err() {
            log::debug!("index removal failed for {}, deleting from disk", name);
            fs::remove_dir_all(output.root().join(name))?;
        }
    }
    Ok(())
}

/// Push the fresh commit according to the configured policy.
fn push(output: &Git, opts: &ReleaseOptions) -> Result<()> {
    if opts.push_policy == PushPolicy::PreferCiBranch {
        if let Some(ci) = &opts.ci {
            return push_to_ci_branch(output, ci);
        }
    }

    if output.succeeds(["rev-parse", "@{u}"])? {
        output.run(["push"])?;
        return Ok(());
    }
    match &opts.ci {
        Some(ci) => push_to_ci_branch(output, ci),
        None => Err(Error::config(
            "cannot push: no upstream configured and not running under CI",
        )),
    }
}

fn push_to_ci_branch(output: &Git, ci: &CiContext) -> Result<()> {
    let branch = ci.commit_branch()?;
    let refspec = format!("HEAD:{}", branch);
    output.run(["push", "origin", refspec.as_str()])?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::process::Command;
    use tempfile::TempDir;

    fn git(root: &Path, args: &[&str]) -> String {
        let out = Command::new("git")
            .arg("-C")
            .arg(root)
            .args([
                "-c",
                "user.email=test@example.com",
                "-c",
                "user.name=test",
            ])
            .args(args)
            .output()
            .unwrap();
        assert!(
            out.status.success(),
            "git {:?} failed: {}",
            args,
            String::from_utf8_lossy(&out.stderr)
        );
        String::from_utf8_lossy(&out.stdout).trim().to_string()
    }

    fn make_module(root: &Path, name: &str) {
        let dir = root.join(name);
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join(crate::manifest::MANIFEST_FILE), "{}").unwrap();
    }

    #[test]
    #[cfg_attr(not(feature = "integration-tests"), ignore)]
    fn test_clear_stale_modules_tracked_and_untracked() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        git(root, &["init"]);

        // One tracked module, one only in the working tree, one non-module dir
        make_module(root, "tracked_mod");
        git(root, &["add", "tracked_mod"]);
        git(root, &["commit", "-m", "seed"]);
        make_module(root, "untracked_mod");
        std::fs::create_dir(root.join("not_a_module")).unwrap();

        clear_stale_modules(&Git::new(root)).unwrap();

        assert!(!root.join("tracked_mod").exists());
        assert!(!root.join("untracked_mod").exists());
        assert!(root.join("not_a_module").exists());
    }

    #[test]
    #[cfg_attr(not(feature = "integration-tests"), ignore)]
    fn test_push_without_upstream_or_ci_fails() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        git(root, &["init"]);
        git(root, &["commit", "--allow-empty", "-m", "seed"]);

        let opts = ReleaseOptions {
            push: true,
            ..Default::default()
        };
        let err = push(&Git::new(root), &opts).unwrap_err();
        assert!(format!("{}", err).contains("no upstream"));
    }

    #[test]
    #[cfg_attr(not(feature = "integration-tests"), ignore)]
    fn test_push_ci_mode_without_branch_is_env_error() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        git(root, &["init"]);
        git(root, &["commit", "--allow-empty", "-m", "seed"]);

        let opts = ReleaseOptions {
            push: true,
            ci: Some(CiContext {
                job_token: "tok".to_string(),
                server_host: "host".to_string(),
                commit_branch: None,
            }),
            ..Default::default()
        };
        let err = push(&Git::new(root), &opts).unwrap_err();
        assert!(format!("{}", err).contains("CI_COMMIT_BRANCH"));
    }
}
