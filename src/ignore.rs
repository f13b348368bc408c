//! File name allow-list handling for the sync check.
//! Files whose name matches one of the patterns are expected to exist only in
//! the derived template and are left out of the comparison.

use crate::error::{Error, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use log::debug;
use std::path::Path;

/// Compiles the given glob patterns into a set matched against file names.
///
/// # Arguments
/// * `patterns` - Glob patterns such as `.copier-answers.yml.jinja` or `*.pyc`
///
/// # Returns
/// * `Result<GlobSet>` - Set of compiled glob patterns for name matching
///
/// # Errors
/// * `Error::IgnorePatternError` if a pattern is not a valid glob
pub fn build_ignore_set<S: AsRef<str>>(patterns: &[S]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let pattern = pattern.as_ref();
        debug!("Ignoring files named '{pattern}'");
        builder.add(Glob::new(pattern).map_err(|e| {
            Error::IgnorePatternError(format!("invalid pattern '{pattern}': {e}"))
        })?);
    }
    builder
        .build()
        .map_err(|e| Error::IgnorePatternError(format!("ignore set build failed: {e}")))
}

/// Whether the file name (last component) of `path` matches the set.
pub fn is_ignored(ignored: &GlobSet, path: &Path) -> bool {
    path.file_name().map(|name| ignored.is_match(name)).unwrap_or(false)
}
