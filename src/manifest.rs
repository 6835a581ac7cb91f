//! Module detection via the manifest marker file.
//!
//! A directory counts as an installable addon module iff it directly contains
//! a `__manifest__.py` file. This is the only validation performed on module
//! internals; everything else is the module author's business.

use std::path::Path;

/// Marker file whose presence qualifies a directory as a module.
pub const MANIFEST_FILE: &str = "__manifest__.py";

/// Returns true iff `path` is a directory containing the manifest marker.
///
/// Nonexistent paths and plain files return false; this never errors.
pub fn is_module(path: &Path) -> bool {
    path.is_dir() && path.join(MANIFEST_FILE).is_file()
}
