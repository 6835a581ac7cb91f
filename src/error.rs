//! # Error Handling
//!
//! Centralized error type for the `addons-filter` application, built with
//! `thiserror`. The enum is a closed taxonomy matching the failure modes the
//! pipeline can hit:
//!
//! - Configuration problems (missing files, missing addon-group mappings,
//!   malformed merge specs).
//! - YAML parse failures, surfaced with the underlying parser detail.
//! - External process failures (git, the aggregation tool).
//! - Revision resolution failures (unknown remote ref, unreachable remote).
//! - Missing required environment variables (CI integration).
//! - Glob pattern and I/O errors, wrapped from their source crates.
//!
//! No error is retried or swallowed; every variant aborts the remaining
//! pipeline steps and maps to exit code 1 at the binary boundary.

use thiserror::Error;

/// Main error type for addons-filter operations
#[derive(Error, Debug)]
pub enum Error {
    /// A user-facing configuration problem.
    ///
    /// Covers missing configuration files, addon groups without a matching
    /// repository spec, malformed merge specs, and push misconfiguration.
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// An external process (git or the aggregation tool) failed.
    #[error("Process execution error: {command} - {stderr}")]
    Process { command: String, stderr: String },

    /// A merge reference could not be resolved to a commit identifier.
    #[error("Failed to resolve '{remote} {r#ref}': {message}")]
    Resolution {
        remote: String,
        r#ref: String,
        message: String,
    },

    /// A required environment variable is unset.
    #[error("Unset environment variable {variable}")]
    Env { variable: String },

    /// A YAML parsing error, wrapped from `serde_yaml::Error`.
    #[error("Invalid YAML content: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A glob pattern error, wrapped from `glob::PatternError`.
    #[error("Glob pattern error: {0}")]
    Glob(#[from] glob::PatternError),

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Shorthand for building a `Config` error from anything displayable.
    pub fn config(message: impl Into<String>) -> Self {
        Error::Config {
            message: message.into(),
        }
    }
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
