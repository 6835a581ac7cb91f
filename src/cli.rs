//! CLI argument parsing and pipeline wiring

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use addons_filter::ci::{self, CiContext};
use addons_filter::config;
use addons_filter::output::OutputConfig;
use addons_filter::release::{self, PushPolicy, ReleaseOptions};
use addons_filter::workspace::{self, Workspace};

/// Filter curated addon modules out of aggregated repositories
#[derive(Parser, Debug)]
#[command(name = "addons-filter")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to the directory containing configuration files
    #[arg(short = 'i', long, value_name = "PATH")]
    input_path: Option<PathBuf>,

    /// Path to the directory that will contain the output
    #[arg(short = 'o', long, value_name = "PATH")]
    output_path: Option<PathBuf>,

    /// Clean the aggregation workspace when the run ends (default)
    #[arg(short = 'c', long, overrides_with = "no_clean")]
    clean: bool,

    /// Keep the aggregation workspace after the run
    #[arg(long, overrides_with = "clean")]
    no_clean: bool,

    /// Reuse a persistent workspace under the platform cache directory
    #[arg(long)]
    cache: bool,

    /// Commit the filtered result (default is an uncommitted dry run)
    #[arg(short = 'r', long)]
    release: bool,

    /// Push to the remote repository if any changes are committed
    #[arg(short = 'p', long)]
    push: bool,

    /// GitLab CI mode: rewrite remote URLs and allow CI-branch pushes
    #[arg(short = 'g', long)]
    gitlab_ci: bool,

    /// When pushing under CI, prefer the CI branch over an existing upstream
    #[arg(long)]
    push_prefer_ci_branch: bool,

    /// Colorize output (always, never, auto)
    #[arg(long, global = true, value_name = "WHEN", default_value = "auto")]
    color: String,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(long, global = true, value_name = "LEVEL", default_value = "info")]
    log_level: String,
}

impl Cli {
    /// Execute the full filtering pipeline.
    pub fn execute(self) -> Result<()> {
        env_logger::Builder::from_env(
            env_logger::Env::default().default_filter_or(self.log_level.as_str()),
        )
        .init();
        let out = OutputConfig::from_env_and_flag(&self.color);

        let input_path = absolutize(self.input_path)?;
        let output_path = absolutize(self.output_path)?;

        println!(
            "Loading configuration files from '{}'",
            input_path.display()
        );
        let (mut repos, repos_config) = config::load_repos(&input_path)?;
        let addons = config::load_addons(&input_path)?;

        // CI environment is captured once, here at the boundary
        let ci_context = if self.gitlab_ci {
            let context = CiContext::from_env()?;
            ci::rewrite_remote_urls(&mut repos, &context);
            Some(context)
        } else {
            None
        };

        // Paired --clean/--no-clean flags override each other, last one wins
        let keep_workspace = self.no_clean && !self.clean;
        let mut workspace = if self.cache {
            Workspace::cached()?
        } else {
            Workspace::ephemeral()?
        };
        if keep_workspace {
            workspace.keep();
        }

        println!("Filtering addons to '{}'", output_path.display());
        let output = workspace::init_output_repo(&output_path)?;

        // In CI mode the aggregation tool reads the rewritten copy; the
        // rewrite already inlined any env-file values
        let (aggregation_config, env_file) = if ci_context.is_some() {
            let rewritten = workspace.root().join("repos.yml");
            ci::dump_rewritten(&rewritten, &repos)?;
            (rewritten, None)
        } else {
            let env_file = input_path.join("repos.env");
            (repos_config, env_file.is_file().then_some(env_file))
        };
        workspace::aggregate(workspace.root(), &aggregation_config, env_file.as_deref())?;

        let opts = ReleaseOptions {
            release: self.release,
            push: self.push,
            ci: ci_context,
            push_policy: if self.push_prefer_ci_branch {
                PushPolicy::PreferCiBranch
            } else {
                PushPolicy::PreferUpstream
            },
        };
        release::run(&output, workspace.root(), &repos, &addons, &opts, &out)?;

        if !keep_workspace && !self.cache {
            println!("Cleaning up intermediate output");
        }
        // Ephemeral workspace is removed when it drops, on success and
        // failure alike
        Ok(())
    }
}

/// Resolve an optional path against the current directory.
fn absolutize(path: Option<PathBuf>) -> Result<PathBuf> {
    let cwd = std::env::current_dir()?;
    Ok(match path {
        Some(p) if p.is_absolute() => p,
        Some(p) => cwd.join(p),
        None => cwd,
    })
}
