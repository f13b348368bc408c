//! Renders a template tree into a concrete project directory.
//!
//! Either template dialect can be rendered: the master tree with the
//! namespaced context, the derived tree with the flat one. Every path and
//! every text file is rendered; binary files are copied unchanged.

use std::fs;
use std::path::{Path, PathBuf};

use globset::GlobSet;
use log::{debug, info};
use walkdir::WalkDir;

use crate::answers::AnswerSet;
use crate::constants::{DERIVED_TEMPLATE_SUFFIX, TEMPLATE_MARKERS};
use crate::error::{Error, Result};
use crate::ignore::is_ignored;
use crate::renderer::TemplateRenderer;
use crate::transform::read_text;

/// Which template syntax a tree is written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Dialect {
    /// Namespaced cookiecutter variables (`{{ cookiecutter.repo_name }}`)
    Master,
    /// Flat copier variables (`{{ repo_name }}`)
    Derived,
}

impl Dialect {
    /// Rendering context for this dialect.
    pub fn context(self, answers: &AnswerSet) -> serde_json::Value {
        match self {
            Dialect::Master => answers.master_context(),
            Dialect::Derived => {
                // Copier renders its answers record from this variable.
                let mut context = answers.derived_context();
                if let serde_json::Value::Object(map) = &mut context {
                    let record = serde_json::Value::Object(map.clone());
                    map.insert("_copier_answers".to_string(), record);
                }
                context
            }
        }
    }
}

/// Counts of what a generation wrote.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct GenerateSummary {
    pub rendered: usize,
    pub copied: usize,
    pub skipped: usize,
}

/// Ensures the output directory is safe to write to.
///
/// # Errors
/// * `Error::OutputDirectoryExistsError` if the directory exists and `force` is false
pub fn ensure_output_dir<P: AsRef<Path>>(output_dir: P, force: bool) -> Result<PathBuf> {
    let output_dir = output_dir.as_ref();
    if output_dir.exists() && !force {
        return Err(Error::OutputDirectoryExistsError {
            output_dir: output_dir.display().to_string(),
        });
    }
    Ok(output_dir.to_path_buf())
}

/// A rendered relative path is usable when it is non-empty, relative and has
/// no empty segment (a segment that rendered to nothing).
pub fn is_rendered_path_valid(path: &str) -> bool {
    !path.is_empty() && !path.starts_with('/') && !path.split('/').any(str::is_empty)
}

/// Strips the `.jinja` suffix from derived-dialect file names.
pub fn target_file_name(rendered: &str, dialect: Dialect) -> &str {
    match dialect {
        Dialect::Derived => rendered.strip_suffix(DERIVED_TEMPLATE_SUFFIX).unwrap_or(rendered),
        Dialect::Master => rendered,
    }
}

/// Renders every entry of `template_dir` into `output_dir`.
///
/// # Arguments
/// * `renderer` - Template engine
/// * `template_dir` - Root whose contents become the project
/// * `output_dir` - Project directory, created if missing
/// * `answers` - Fully resolved answer set
/// * `dialect` - Syntax the template tree is written in
///
/// # Errors
/// * `Error::TemplateDoesNotExistsError` if `template_dir` is not a directory
/// * `Error::MinijinjaError` if a path or file fails to render, including
///   references to variables missing from the answers
pub fn generate_project<T: AsRef<Path>, O: AsRef<Path>>(
    renderer: &dyn TemplateRenderer,
    template_dir: T,
    output_dir: O,
    answers: &AnswerSet,
    dialect: Dialect,
) -> Result<GenerateSummary> {
    let template_dir = template_dir.as_ref();
    let output_dir = output_dir.as_ref();
    if !template_dir.is_dir() {
        return Err(Error::TemplateDoesNotExistsError {
            template_dir: template_dir.display().to_string(),
        });
    }

    let context = dialect.context(answers);
    let mut summary = GenerateSummary::default();
    fs::create_dir_all(output_dir)?;

    for entry in WalkDir::new(template_dir).min_depth(1).sort_by_file_name() {
        let entry = entry?;
        let path = entry.path();
        let relative = path
            .strip_prefix(template_dir)
            .map_err(|e| Error::TemplateError(e.to_string()))?
            .to_str()
            .ok_or_else(|| {
                Error::TemplateError(format!("non UTF-8 path: {}", path.display()))
            })?
            .replace('\\', "/");

        let rendered = renderer.render(&relative, &context)?.trim().to_string();
        if !is_rendered_path_valid(&rendered) {
            debug!("Skipping '{relative}': rendered path '{rendered}' is empty");
            summary.skipped += 1;
            continue;
        }

        if path.is_dir() {
            fs::create_dir_all(output_dir.join(&rendered))?;
            continue;
        }

        let target = output_dir.join(target_file_name(&rendered, dialect));
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        match read_text(path)? {
            Some(content) => {
                fs::write(&target, renderer.render(&content, &context)?)?;
                summary.rendered += 1;
                debug!("Rendered: '{}'", target.display());
            }
            None => {
                fs::copy(path, &target)?;
                summary.copied += 1;
                debug!("Copied: '{}'", target.display());
            }
        }
    }

    info!(
        "Generated {} files ({} copied) in {}",
        summary.rendered + summary.copied,
        summary.copied,
        output_dir.display()
    );
    Ok(summary)
}

/// Text files under `dir` that still contain a template delimiter.
pub fn find_unresolved_markers<P: AsRef<Path>>(dir: P, ignore: &GlobSet) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    let mut offenders = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() || is_ignored(ignore, entry.path()) {
            continue;
        }
        if let Some(content) = read_text(entry.path())? {
            if TEMPLATE_MARKERS.iter().any(|marker| content.contains(marker)) {
                offenders.push(entry.path().to_path_buf());
            }
        }
    }
    Ok(offenders)
}

/// Fails with `Error::UnresolvedMarkersError` if any file under `dir` still
/// contains a template delimiter.
pub fn check_no_unresolved_markers<P: AsRef<Path>>(dir: P, ignore: &GlobSet) -> Result<()> {
    let files = find_unresolved_markers(dir, ignore)?;
    if files.is_empty() {
        return Ok(());
    }
    Err(Error::UnresolvedMarkersError { files })
}
