//! Post-generation processing of a rendered project.
//!
//! Runs once after a template has been rendered into a project directory and
//! applies the answer-dependent clean-up: unused scaffolds are removed, the
//! dependency manifest and the Python version constraint are written, and an
//! optional custom config is overlaid.

pub mod dependencies;
pub mod layout;
pub mod options;
pub mod overlay;
pub mod python_version;

use std::path::Path;

use log::{debug, info};

use crate::answers::AnswerSet;
use crate::error::{Error, Result};
use dependencies::{write_dependencies, DependencyFile, DependencySet};
use layout::{
    hoist_variant, prune_variant_dirs, remove_path, replace_in_file, select_variant, strip_package,
};
use options::ProjectOptions;
use overlay::apply_overlay;
use python_version::write_python_version;

/// Runs the post-generation steps for `answers` on `project_dir`.
///
/// # Returns
/// * `Result<DependencySet>` - The dependency list that was assembled
///
/// # Errors
/// * `Error::ConfigError` if the answers are incomplete
/// * `Error::PythonVersionError` for a malformed `python_version_number`
/// * `Error::OverlaySourceError` if `custom_config` cannot be resolved
/// * `Error::IoError` for file system failures
pub fn run_post_gen<P: AsRef<Path>>(project_dir: P, answers: &AnswerSet) -> Result<DependencySet> {
    let project_dir = project_dir.as_ref();
    if !project_dir.is_dir() {
        return Err(Error::TemplateDoesNotExistsError {
            template_dir: project_dir.display().to_string(),
        });
    }
    let options = ProjectOptions::from_answers(answers)?;
    let dependency_file = DependencyFile::from_name(&options.dependency_file)?;
    // Reject a malformed version before touching the project.
    options.python_version_number.parse::<python_version::VersionSpecifier>()?;

    let dependencies = DependencySet::for_options(&options);
    debug!("Packages to install: {:?}", dependencies.packages());
    debug!("PyPI-only packages: {:?}", dependencies.pip_only());

    if options.linting_and_formatting == "ruff" {
        remove_path(&project_dir.join("setup.cfg"))?;
    }

    let testing = options.testing_framework.as_str();
    select_variant(&project_dir.join("tests"), (testing != "none").then_some(testing))?;

    let docs_dir = project_dir.join("docs");
    if options.docs != "none" {
        hoist_variant(&docs_dir, &options.docs)?;
    }
    // The docs directory itself always stays; only its scaffolds go.
    prune_variant_dirs(&docs_dir)?;

    if options.environment_manager != "conda" {
        remove_path(&project_dir.join("environment.yml"))?;
    }
    if ["conda", "uv", "none"].contains(&options.environment_manager.as_str()) {
        remove_path(&project_dir.join("requirements-dev.txt"))?;
    }

    write_dependencies(project_dir, dependency_file, &dependencies)?;
    write_python_version(project_dir, &options.python_version_number)?;
    apply_overlay(&options.custom_config, project_dir)?;

    if !options.keeps_license() {
        remove_path(&project_dir.join("LICENSE"))?;
    }

    // Jinja's tojson escapes single quotes.
    replace_in_file(&project_dir.join("pyproject.toml"), r"\u0027", "'")?;

    if !options.code_scaffold() {
        strip_package(&project_dir.join(&options.module_name))?;
    }

    info!("Post-generation steps completed for {}", project_dir.display());
    Ok(dependencies)
}
