//! # Configuration Schema and Parsing
//!
//! Two YAML files drive a run, both looked up with a `.yml`-then-`.yaml`
//! suffix preference:
//!
//! - `repos.y[a]ml`: mapping of repository name to [`RepoSpec`], in the
//!   format consumed by the external aggregation tool. Keys may be
//!   path-relative (`./name`). When a sibling `repos.env` exists, its values
//!   are substituted into the raw YAML text (`$VAR` / `${VAR}`) before
//!   parsing, so credentials and hosts can live outside the tracked file.
//! - `addons.y[a]ml`: mapping of repository name to a list of glob patterns
//!   selecting which module directories to import. File order is preserved:
//!   it determines commit-message order.
//!
//! Unknown `RepoSpec` fields are ignored; the aggregation tool owns the rest
//! of its schema.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// One source repository entry from `repos.y[a]ml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepoSpec {
    /// Remote name to URL mapping, used for fetch/push target resolution.
    #[serde(default)]
    pub remotes: BTreeMap<String, String>,
    /// Legacy branch override (`"<remote> <branch>"`). Only the branch token
    /// is consulted; the field is dropped when re-emitting configuration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    /// Ordered merge specs, each `"<remote> <ref>"`. Non-empty for any
    /// repository that contributes modules.
    #[serde(default)]
    pub merges: Vec<String>,
}

/// The full `repos.y[a]ml` mapping.
pub type Repos = BTreeMap<String, RepoSpec>;

/// One addon group: a repository name plus the patterns selecting its modules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddonGroup {
    pub name: String,
    pub patterns: Vec<String>,
}

/// Locate `<dir>/<stem>.yml` or `<dir>/<stem>.yaml`, preferring `.yml`.
pub fn find_yaml(dir: &Path, stem: &str) -> Result<PathBuf> {
    for suffix in ["yml", "yaml"] {
        let candidate = dir.join(format!("{}.{}", stem, suffix));
        if candidate.is_file() {
            return Ok(candidate);
        }
    }
    Err(Error::config(format!(
        "YAML file {} not found",
        dir.join(format!("{}.y[a]ml", stem)).display()
    )))
}

/// Load and parse `repos.y[a]ml`, substituting `repos.env` values if present.
///
/// Returns the parsed mapping together with the path of the file actually
/// read, which is later handed to the aggregation tool.
pub fn load_repos(input_dir: &Path) -> Result<(Repos, PathBuf)> {
    let path = find_yaml(input_dir, "repos")?;
    let mut text = fs::read_to_string(&path)?;

    let env_path = input_dir.join("repos.env");
    if env_path.is_file() {
        let vars = parse_env_file(&env_path)?;
        text = substitute(&text, &vars)?;
    }

    let repos: Repos = serde_yaml::from_str(&text)?;
    Ok((repos, path))
}

/// Load `addons.y[a]ml` as an ordered list of addon groups.
///
/// Parsed through `serde_yaml::Mapping` rather than a map type so the file's
/// own ordering survives into the commit message.
pub fn load_addons(input_dir: &Path) -> Result<Vec<AddonGroup>> {
    let path = find_yaml(input_dir, "addons")?;
    let text = fs::read_to_string(&path)?;
    let mapping: serde_yaml::Mapping = serde_yaml::from_str(&text)?;

    let mut groups = Vec::with_capacity(mapping.len());
    for (key, value) in mapping {
        let name = key
            .as_str()
            .ok_or_else(|| {
                Error::config(format!("{}: repository names must be strings", path.display()))
            })?
            .to_string();
        let patterns: Vec<String> = serde_yaml::from_value(value)?;
        groups.push(AddonGroup { name, patterns });
    }
    Ok(groups)
}

/// Look up the spec for an addon group, also trying the `./<name>` alias used
/// by path-relative keys in the aggregation config.
pub fn repo_for_group<'a>(repos: &'a Repos, name: &str) -> Result<&'a RepoSpec> {
    repos
        .get(name)
        .or_else(|| repos.get(&format!("./{}", name)))
        .ok_or_else(|| {
            Error::config(format!(
                "addons.yml entry {} not found in repos.yml",
                name
            ))
        })
}

/// Parse a dotenv-style file: `KEY=VALUE` lines, `#` comments, optional
/// surrounding quotes on the value.
pub fn parse_env_file(path: &Path) -> Result<BTreeMap<String, String>> {
    let text = fs::read_to_string(path)?;
    let mut vars = BTreeMap::new();
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((key, value)) = line.split_once('=') else {
            return Err(Error::config(format!(
                "{}: malformed line '{}'",
                path.display(),
                line
            )));
        };
        let value = value.trim();
        let value = value
            .strip_prefix('"')
            .and_then(|v| v.strip_suffix('"'))
            .or_else(|| value.strip_prefix('\'').and_then(|v| v.strip_suffix('\'')))
            .unwrap_or(value);
        vars.insert(key.trim().to_string(), value.to_string());
    }
    Ok(vars)
}

/// Substitute `$VAR` / `${VAR}` references with `vars` values. `$$` escapes a
/// literal dollar. Any reference to an undefined variable is a hard error.
pub fn substitute(text: &str, vars: &BTreeMap<String, String>) -> Result<String> {
    let re = Regex::new(r"\$(?:(\$)|\{([A-Za-z_][A-Za-z0-9_]*)\}|([A-Za-z_][A-Za-z0-9_]*))")
        .map_err(|e| Error::config(format!("internal substitution pattern: {}", e)))?;

    // Validate up front so replacement itself cannot fail
    for caps in re.captures_iter(text) {
        if let Some(name) = caps.get(2).or_else(|| caps.get(3)) {
            if !vars.contains_key(name.as_str()) {
                return Err(Error::config(format!(
                    "undefined variable ${} in templated YAML",
                    name.as_str()
                )));
            }
        }
    }

    let result = re.replace_all(text, |caps: &regex::Captures| {
        if caps.get(1).is_some() {
            "$".to_string()
        } else {
            let name = caps
                .get(2)
                .or_else(|| caps.get(3))
                .map(|m| m.as_str())
                .unwrap_or_default();
            vars.get(name).cloned().unwrap_or_default()
        }
    });
    Ok(result.into_owned())
}
