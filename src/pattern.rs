//! Glob matching of module directory names against addon-group patterns.
//!
//! Semantics are the `glob` crate's defaults: `*`, `?` and `[..]` character
//! classes, case-sensitive, anchored to the full name. `**` has no special
//! meaning here since only single path components are ever matched.

use crate::error::Result;
use glob::Pattern;

/// Returns true iff `name` fully matches at least one of `patterns`.
///
/// Evaluation short-circuits on the first match; pattern order carries no
/// other meaning. An invalid pattern is a hard error, not a non-match.
pub fn matches_any(name: &str, patterns: &[String]) -> Result<bool> {
    for pattern in patterns {
        if Pattern::new(pattern)?.matches(name) {
            return Ok(true);
        }
    }
    Ok(false)
}
