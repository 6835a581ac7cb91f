//! Merge-spec resolution.
//!
//! Each `"<remote> <ref>"` merge spec recorded in `repos.y[a]ml` is resolved
//! to a concrete commit identifier for the synthesized commit message. The
//! ref shape alone picks the strategy:
//!
//! - contains `/`: a remote-tracking reference (merge requests, pull heads),
//!   resolved through the remote's reference listing.
//! - exactly 40 characters: already a full identifier, passed through with
//!   the spec line emitted verbatim.
//! - anything else: a branch-style ref, resolved as `<remote>/<ref>` against
//!   the local aggregation clone.
//!
//! Resolution is deterministic for a fixed remote/workspace state, and a
//! missing or unreachable ref is a hard error, never an empty match.

use crate::error::{Error, Result};
use crate::git::Git;

/// Length of a full commit identifier.
const FULL_ID_LEN: usize = 40;

/// How a merge ref will be resolved, decided purely by its shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionKind {
    /// Query the remote's reference listing (`ls-remote`).
    RemoteListing,
    /// Already a full commit identifier; no lookup.
    Literal,
    /// Resolve `<remote>/<ref>` in the local clone (`rev-parse`).
    LocalRev,
}

/// A parsed `"<remote> <ref>"` merge spec.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeSpec {
    pub remote: String,
    pub r#ref: String,
    raw: String,
}

impl MergeSpec {
    /// Parse a merge spec. Exactly two whitespace-separated tokens.
    pub fn parse(raw: &str) -> Result<Self> {
        let raw = raw.trim();
        let mut tokens = raw.split_whitespace();
        match (tokens.next(), tokens.next(), tokens.next()) {
            (Some(remote), Some(r#ref), None) => Ok(Self {
                remote: remote.to_string(),
                r#ref: r#ref.to_string(),
                raw: raw.to_string(),
            }),
            _ => Err(Error::config(format!(
                "malformed merge spec '{}': expected '<remote> <ref>'",
                raw
            ))),
        }
    }

    /// The original spec text, as recorded in configuration.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn kind(&self) -> ResolutionKind {
        if self.r#ref.contains('/') {
            ResolutionKind::RemoteListing
        } else if self.r#ref.len() == FULL_ID_LEN {
            ResolutionKind::Literal
        } else {
            ResolutionKind::LocalRev
        }
    }

    /// Resolve this spec against `clone` and render its commit-message line.
    ///
    /// Literal identifiers produce the raw spec unchanged; the other two
    /// classes append the resolved identifier.
    pub fn resolve(&self, clone: &Git) -> Result<String> {
        let id = match self.kind() {
            ResolutionKind::Literal => return Ok(self.raw.clone()),
            ResolutionKind::RemoteListing => {
                let listing = clone
                    .run(["ls-remote", "--exit-code", self.remote.as_str(), self.r#ref.as_str()])
                    .map_err(|e| self.resolution_error(e))?;
                listing
                    .split_whitespace()
                    .next()
                    .map(|id| id.to_string())
                    .ok_or_else(|| Error::Resolution {
                        remote: self.remote.clone(),
                        r#ref: self.r#ref.clone(),
                        message: "empty ls-remote listing".to_string(),
                    })?
            }
            ResolutionKind::LocalRev => {
                let rev = format!("{}/{}", self.remote, self.r#ref);
                clone
                    .run(["rev-parse", rev.as_str()])
                    .map_err(|e| self.resolution_error(e))?
            }
        };
        Ok(format!("{} {}", self.raw, id.trim()))
    }

    fn resolution_error(&self, source: Error) -> Error {
        match source {
            Error::Process { stderr, .. } => Error::Resolution {
                remote: self.remote.clone(),
                r#ref: self.r#ref.clone(),
                message: stderr,
            },
            other => other,
        }
    }
}
