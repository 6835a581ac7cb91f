//! # Addons Filter Library
//!
//! Core functionality for filtering a curated subset of addon modules out of
//! aggregated source-control repositories and republishing them into an
//! output repository. Used by the `addons-filter` command-line tool, but the
//! pieces are usable on their own.
//!
//! ## Core Concepts
//!
//! - **Module detection (`manifest`)**: a directory is an importable module
//!   iff it directly contains the manifest marker file.
//! - **Pattern selection (`pattern`)**: per-repository glob patterns decide
//!   which module directories are imported.
//! - **Merge resolution (`resolver`)**: every configured `"<remote> <ref>"`
//!   merge spec is resolved to a concrete commit identifier so the synthesized
//!   commit message can trace exactly what was merged.
//! - **Repository filtering (`filter`)**: per source repository, a depth-1
//!   fetch of the aggregated branch followed by targeted checkouts of the
//!   matching modules into the output tree.
//! - **Release orchestration (`release`)**: the full pass over all addon
//!   groups, stale-module clearing, commit-message synthesis, and the
//!   commit/push decision.
//!
//! ## Execution Flow
//!
//! A run proceeds strictly sequentially: load configuration (`config`),
//! optionally rewrite remote URLs for CI (`ci`), let the external aggregation
//! tool populate the workspace (`workspace`), then filter every addon group
//! and commit or leave a dry-run snapshot (`release`). All version-control
//! work is delegated to the system git binary (`git`); any failing external
//! invocation aborts the run.

pub mod ci;
pub mod config;
pub mod error;
pub mod filter;
pub mod git;
pub mod manifest;
pub mod output;
pub mod pattern;
pub mod release;
pub mod resolver;
pub mod workspace;

pub use error::{Error, Result};
