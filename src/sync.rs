//! Verifies that the committed derived template matches a fresh
//! regeneration from the master template.
//!
//! The derived tree is regenerated into a scratch directory that is removed
//! when the check returns, whatever the outcome. Differences are collected
//! for the whole tree rather than stopping at the first one.

use std::collections::BTreeSet;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use globset::GlobSet;
use log::{debug, info};
use walkdir::WalkDir;

use crate::constants::{DEFAULT_REPORT_LIMIT, DEFAULT_SYNC_IGNORE};
use crate::error::{Error, Result};
use crate::ignore::{build_ignore_set, is_ignored};
use crate::rewriter::Rewriter;
use crate::transform::{decode_text, transform_tree};

/// A single mismatch between the regenerated and the committed tree.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum Difference {
    OnlyInGenerated(PathBuf),
    OnlyInCommitted(PathBuf),
    ContentDiffers(PathBuf),
    BinaryContentDiffers(PathBuf),
}

impl Difference {
    /// Path of the differing file relative to the tree roots.
    pub fn path(&self) -> &Path {
        match self {
            Difference::OnlyInGenerated(path)
            | Difference::OnlyInCommitted(path)
            | Difference::ContentDiffers(path)
            | Difference::BinaryContentDiffers(path) => path,
        }
    }
}

impl fmt::Display for Difference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Difference::OnlyInGenerated(path) => {
                write!(f, "Only in generated template: {}", path.display())
            }
            Difference::OnlyInCommitted(path) => {
                write!(f, "Only in committed template: {}", path.display())
            }
            Difference::ContentDiffers(path) => write!(f, "Content differs: {}", path.display()),
            Difference::BinaryContentDiffers(path) => {
                write!(f, "Binary content differs: {}", path.display())
            }
        }
    }
}

/// Outcome of comparing two trees.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SyncReport {
    /// Files present in both trees that were compared.
    pub compared: usize,
    pub differences: Vec<Difference>,
}

impl SyncReport {
    pub fn is_in_sync(&self) -> bool {
        self.differences.is_empty()
    }

    /// The first `limit` differences, one per line, with a note about how
    /// many were left out.
    pub fn summary(&self, limit: usize) -> String {
        let mut lines: Vec<String> =
            self.differences.iter().take(limit).map(ToString::to_string).collect();
        if self.differences.len() > limit {
            lines.push(format!("... and {} more", self.differences.len() - limit));
        }
        lines.join("\n")
    }

    /// Turns any difference into `Error::DriftDetected`.
    pub fn into_result(self, limit: usize) -> Result<SyncReport> {
        if self.is_in_sync() {
            return Ok(self);
        }
        Err(Error::DriftDetected {
            count: self.differences.len(),
            summary: self.summary(limit),
        })
    }
}

/// Settings for [`check_sync`].
#[derive(Debug, Clone)]
pub struct SyncOptions {
    /// File names expected to exist in only one of the trees.
    pub ignore: GlobSet,
    /// Number of differences shown in the failure message.
    pub limit: usize,
    /// Directory the scratch regeneration is created in.
    pub scratch_root: PathBuf,
}

impl SyncOptions {
    pub fn new<S: AsRef<str>>(ignore_patterns: &[S], limit: usize) -> Result<Self> {
        Ok(Self {
            ignore: build_ignore_set(ignore_patterns)?,
            limit,
            scratch_root: std::env::temp_dir(),
        })
    }

    pub fn with_scratch_root<P: Into<PathBuf>>(mut self, scratch_root: P) -> Self {
        self.scratch_root = scratch_root.into();
        self
    }

    /// Ignores `.copier-answers.yml.jinja` and shows twenty differences.
    pub fn with_defaults() -> Result<Self> {
        Self::new(&DEFAULT_SYNC_IGNORE[..], DEFAULT_REPORT_LIMIT)
    }
}

/// Relative paths of all regular files below `root`, minus ignored names.
fn collect_files(root: &Path, ignore: &GlobSet) -> Result<BTreeSet<PathBuf>> {
    let mut files = BTreeSet::new();
    for entry in WalkDir::new(root).min_depth(1) {
        let entry = entry?;
        if !entry.path().is_file() {
            continue;
        }
        let relative = entry
            .path()
            .strip_prefix(root)
            .map_err(|e| Error::TemplateError(e.to_string()))?
            .to_path_buf();
        if is_ignored(ignore, &relative) {
            debug!("Skipping ignored file '{}'", relative.display());
            continue;
        }
        files.insert(relative);
    }
    Ok(files)
}

/// Compares one file present in both trees. Text is compared after line
/// ending normalization; if either side is not UTF-8 the raw bytes are compared.
fn compare_file(generated: &Path, committed: &Path, relative: &Path) -> Result<Option<Difference>> {
    let generated_bytes = fs::read(generated)?;
    let committed_bytes = fs::read(committed)?;

    match (decode_text(generated_bytes.clone()), decode_text(committed_bytes.clone())) {
        (Some(generated_text), Some(committed_text)) => {
            Ok((generated_text != committed_text)
                .then(|| Difference::ContentDiffers(relative.to_path_buf())))
        }
        _ => Ok((generated_bytes != committed_bytes)
            .then(|| Difference::BinaryContentDiffers(relative.to_path_buf()))),
    }
}

/// Compares two trees file by file, keyed on relative path.
///
/// # Arguments
/// * `generated` - Freshly regenerated tree
/// * `committed` - Tree under version control
/// * `ignore` - File names excluded on both sides
///
/// # Returns
/// * `Result<SyncReport>` - Every difference found, in path order
pub fn compare_trees<G: AsRef<Path>, C: AsRef<Path>>(
    generated: G,
    committed: C,
    ignore: &GlobSet,
) -> Result<SyncReport> {
    let generated = generated.as_ref();
    let committed = committed.as_ref();
    let generated_files = collect_files(generated, ignore)?;
    let committed_files = collect_files(committed, ignore)?;

    let mut report = SyncReport::default();
    for path in generated_files.difference(&committed_files) {
        report.differences.push(Difference::OnlyInGenerated(path.clone()));
    }
    for path in committed_files.difference(&generated_files) {
        report.differences.push(Difference::OnlyInCommitted(path.clone()));
    }
    for path in generated_files.intersection(&committed_files) {
        report.compared += 1;
        if let Some(difference) = compare_file(&generated.join(path), &committed.join(path), path)? {
            report.differences.push(difference);
        }
    }
    report.differences.sort_by(|a, b| a.path().cmp(b.path()).then_with(|| a.cmp(b)));
    Ok(report)
}

/// Regenerates the derived tree from `master` into a scratch directory and
/// compares it with `derived`.
///
/// The scratch directory is a [`tempfile::TempDir`] and is removed when this
/// function returns, on success and on error alike.
pub fn verify_sync<M: AsRef<Path>, D: AsRef<Path>>(
    rewriter: &Rewriter,
    master: M,
    derived: D,
    ignore: &GlobSet,
) -> Result<SyncReport> {
    verify_sync_in(rewriter, master, derived, ignore, std::env::temp_dir())
}

/// [`verify_sync`] with the scratch directory created under `scratch_root`.
pub fn verify_sync_in<M: AsRef<Path>, D: AsRef<Path>, R: AsRef<Path>>(
    rewriter: &Rewriter,
    master: M,
    derived: D,
    ignore: &GlobSet,
    scratch_root: R,
) -> Result<SyncReport> {
    let derived = derived.as_ref();
    if !derived.is_dir() {
        return Err(Error::TemplateDoesNotExistsError {
            template_dir: derived.display().to_string(),
        });
    }

    let scratch = tempfile::Builder::new().prefix("ccds-sync-").tempdir_in(scratch_root)?;
    let regenerated = scratch.path().join("template");
    debug!("Regenerating into '{}'", regenerated.display());
    transform_tree(rewriter, master, &regenerated)?;

    compare_trees(&regenerated, derived, ignore)
}

/// Runs [`verify_sync`] and fails with `Error::DriftDetected` on any
/// difference.
pub fn check_sync<M: AsRef<Path>, D: AsRef<Path>>(
    rewriter: &Rewriter,
    master: M,
    derived: D,
    options: &SyncOptions,
) -> Result<SyncReport> {
    let report = verify_sync_in(rewriter, master, derived, &options.ignore, &options.scratch_root)?;
    if report.is_in_sync() {
        info!("Derived template is in sync ({} files compared).", report.compared);
    }
    report.into_result(options.limit)
}
