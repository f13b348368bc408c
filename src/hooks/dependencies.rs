//! Dependency list assembly and dependency manifest writing.
//!
//! [`DependencySet`] starts from a fixed base list and each step returns a
//! new set with the packages for one selected feature added. Output is
//! always sorted, so the same answers write byte-identical files.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use indexmap::IndexSet;
use log::debug;
use toml_edit::{Array, DocumentMut, Item, Value};

use super::options::ProjectOptions;
use crate::error::{Error, Result};

pub const BASE_PACKAGES: [&str; 1] = ["python-dotenv"];
/// Packages not installable from conda channels.
pub const PIP_ONLY_PACKAGES: [&str; 2] = ["awscli", "python-dotenv"];
pub const FLAKE8_BLACK_ISORT: [&str; 3] = ["black", "flake8", "isort"];
pub const RUFF: [&str; 1] = ["ruff"];
pub const BASIC: [&str; 4] = ["matplotlib", "numpy", "pandas", "scikit-learn"];
pub const SCAFFOLD: [&str; 3] = ["typer", "loguru", "tqdm"];

/// Where the dependency list is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DependencyFile {
    RequirementsTxt,
    PyprojectToml,
    /// Conda environments keep their own file; nothing is written.
    EnvironmentYml,
}

impl DependencyFile {
    pub fn from_name(name: &str) -> Result<Self> {
        match name {
            "requirements.txt" => Ok(Self::RequirementsTxt),
            "pyproject.toml" => Ok(Self::PyprojectToml),
            "environment.yml" => Ok(Self::EnvironmentYml),
            other => Err(Error::ValidationError(format!(
                "unknown dependency file '{other}' (expected requirements.txt, pyproject.toml or environment.yml)"
            ))),
        }
    }

    pub fn file_name(self) -> &'static str {
        match self {
            Self::RequirementsTxt => "requirements.txt",
            Self::PyprojectToml => "pyproject.toml",
            Self::EnvironmentYml => "environment.yml",
        }
    }
}

/// Duplicate-free package lists: everything to install, and the subset
/// that is only available from PyPI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencySet {
    packages: IndexSet<String>,
    pip_only: IndexSet<String>,
}

impl DependencySet {
    pub fn base() -> Self {
        Self {
            packages: BASE_PACKAGES.iter().map(|p| p.to_string()).collect(),
            pip_only: PIP_ONLY_PACKAGES.iter().map(|p| p.to_string()).collect(),
        }
    }

    /// Adds `packages` when `condition` holds.
    pub fn add_if(mut self, condition: bool, packages: &[&str]) -> Self {
        if condition {
            self.packages.extend(packages.iter().map(|p| p.to_string()));
        }
        self
    }

    /// Adds `packages` to both lists when `condition` holds.
    pub fn add_pip_only_if(mut self, condition: bool, packages: &[&str]) -> Self {
        if condition {
            self.pip_only.extend(packages.iter().map(|p| p.to_string()));
        }
        self.add_if(condition, packages)
    }

    /// The packages implied by the selected features.
    pub fn for_options(options: &ProjectOptions) -> Self {
        let lint = options.linting_and_formatting.as_str();
        let docs = options.docs.as_str();
        Self::base()
            .add_if(options.dataset_storage == "s3", &["awscli"])
            .add_if(options.code_scaffold(), &SCAFFOLD)
            .add_if(options.pydata_packages == "basic", &BASIC)
            .add_if(lint == "ruff", &RUFF)
            .add_if(lint == "flake8+black+isort", &FLAKE8_BLACK_ISORT)
            .add_if(options.testing_framework == "pytest", &["pytest"])
            .add_pip_only_if(docs != "none", &[docs])
    }

    /// All packages, sorted.
    pub fn packages(&self) -> Vec<String> {
        sorted(&self.packages)
    }

    /// PyPI-only packages, sorted.
    pub fn pip_only(&self) -> Vec<String> {
        sorted(&self.pip_only)
    }

    pub fn contains(&self, package: &str) -> bool {
        self.packages.contains(package)
    }
}

fn sorted(set: &IndexSet<String>) -> Vec<String> {
    let mut items: Vec<String> = set.iter().cloned().collect();
    items.sort();
    items
}

/// `requirements.txt` content: sorted packages followed by the editable
/// install of the project itself.
pub fn format_requirements(dependencies: &DependencySet) -> String {
    let mut lines = dependencies.packages();
    lines.push("-e .".to_string());
    let mut content = lines.join("\n");
    content.push('\n');
    content
}

fn multiline_array(items: impl IntoIterator<Item = String>) -> Array {
    let mut array = Array::new();
    for item in items {
        array.push(item);
    }
    for value in array.iter_mut() {
        value.decor_mut().set_prefix("\n    ");
    }
    array.set_trailing("\n");
    array.set_trailing_comma(true);
    array
}

/// Merges the packages into `[project].dependencies` of a pyproject
/// document, keeping entries already present. The result is sorted and
/// written one package per line.
pub fn merge_pyproject_dependencies(content: &str, dependencies: &DependencySet) -> Result<String> {
    let mut doc: DocumentMut = content.parse()?;
    let project = doc
        .get_mut("project")
        .and_then(Item::as_table_like_mut)
        .ok_or_else(|| Error::ConfigError("pyproject.toml has no [project] table".to_string()))?;

    let mut all: BTreeSet<String> = dependencies.packages().into_iter().collect();
    if let Some(existing) = project.get("dependencies").and_then(Item::as_array) {
        all.extend(existing.iter().filter_map(|v| v.as_str().map(str::to_string)));
    }
    project.insert("dependencies", Item::Value(Value::Array(multiline_array(all))));
    Ok(doc.to_string())
}

/// Writes the dependency manifest into the project directory.
pub fn write_dependencies(
    project_dir: &Path,
    file: DependencyFile,
    dependencies: &DependencySet,
) -> Result<()> {
    let path = project_dir.join(file.file_name());
    match file {
        DependencyFile::RequirementsTxt => {
            fs::write(&path, format_requirements(dependencies))?;
        }
        DependencyFile::PyprojectToml => {
            let content = fs::read_to_string(&path)?;
            fs::write(&path, merge_pyproject_dependencies(&content, dependencies)?)?;
        }
        DependencyFile::EnvironmentYml => {
            debug!("Leaving environment.yml untouched");
            return Ok(());
        }
    }
    debug!("Wrote {} packages to {}", dependencies.packages().len(), path.display());
    Ok(())
}
