//! # Repository Filter
//!
//! Per-repository step of the pipeline: wire the aggregation clone up as a
//! remote of the output repository, fetch a depth-1 slice of the aggregated
//! branch, check matching modules out into the output tree, and build the
//! traceability fragment for the commit message.
//!
//! Only matched module paths are touched; everything else in the output tree
//! is left as-is. Any git failure here is fatal for the run.

use std::fs;
use std::path::Path;

use crate::config::RepoSpec;
use crate::error::Result;
use crate::git::Git;
use crate::manifest::is_module;
use crate::pattern::matches_any;
use crate::resolver::MergeSpec;

/// Branch produced by the aggregation stage when no `target` override exists.
pub const DEFAULT_AGGREGATED_BRANCH: &str = "_git_aggregated";

/// Filter one repository's modules into the output tree.
///
/// Returns the message fragment: the repository name header followed by one
/// resolved line per configured merge spec, in configuration order.
pub fn filter_repo(
    output: &Git,
    workspace_root: &Path,
    name: &str,
    spec: &RepoSpec,
    patterns: &[String],
) -> Result<String> {
    let clone_path = workspace_root.join(name);
    let branch = fetch_branch(spec);

    // Point a remote at the aggregation clone, reusing one if present
    let clone_url = clone_path.to_string_lossy();
    if output.succeeds(["remote", "get-url", name])? {
        output.run(["remote", "set-url", name, clone_url.as_ref()])?;
    } else {
        output.run(["remote", "add", name, clone_url.as_ref()])?;
    }
    output.run(["fetch", "--depth", "1", name, branch])?;

    // Check out each matching module from the fetched branch
    let mut entries: Vec<String> = Vec::new();
    for entry in fs::read_dir(&clone_path)? {
        let entry = entry?;
        if entry.path().is_dir() {
            entries.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    entries.sort();

    let remote_branch = format!("{}/{}", name, branch);
    for fname in &entries {
        if is_module(&clone_path.join(fname)) && matches_any(fname, patterns)? {
            output.run(["checkout", remote_branch.as_str(), "--", fname.as_str()])?;
            println!("Added module {}", fname);
        }
    }

    // Message fragment tracing what was merged
    let clone = Git::new(&clone_path);
    let mut lines = vec![name.to_string()];
    for merge in &spec.merges {
        lines.push(MergeSpec::parse(merge)?.resolve(&clone)?);
    }
    let message = lines.join("\n");
    log::debug!("partial message:\n{}", message);
    Ok(message)
}

/// The branch to fetch: second token of `target` if set, else the default
/// aggregated branch.
fn fetch_branch(spec: &RepoSpec) -> &str {
    spec.target
        .as_deref()
        .and_then(|t| t.split_whitespace().nth(1))
        .unwrap_or(DEFAULT_AGGREGATED_BRANCH)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn spec(target: Option<&str>) -> RepoSpec {
        RepoSpec {
            remotes: BTreeMap::new(),
            target: target.map(|t| t.to_string()),
            merges: vec![],
        }
    }

    #[test]
    fn test_fetch_branch_default() {
        assert_eq!(fetch_branch(&spec(None)), DEFAULT_AGGREGATED_BRANCH);
    }

    #[test]
    fn test_fetch_branch_from_target() {
        assert_eq!(fetch_branch(&spec(Some("origin 16.0"))), "16.0");
    }

    #[test]
    fn test_fetch_branch_malformed_target_falls_back() {
        // A single-token target carries no branch
        assert_eq!(fetch_branch(&spec(Some("origin"))), DEFAULT_AGGREGATED_BRANCH);
    }
}
